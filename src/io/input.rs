//! Request bodies from files or stdin.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::domain::Input;
use crate::error::AppError;

/// Read a JSON record (or list of records) from `path`, or stdin when the
/// path is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<Input, AppError> {
    let value = match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p)
                .map_err(|e| AppError::new(2, format!("Failed to open input '{}': {e}", p.display())))?;
            parse_input(BufReader::new(file), &p.display().to_string())?
        }
        _ => parse_input(std::io::stdin().lock(), "stdin")?,
    };
    Ok(Input::from_value(value)?)
}

fn parse_input<R: Read>(reader: R, source: &str) -> Result<Value, AppError> {
    serde_json::from_reader(reader).map_err(|e| AppError::new(2, format!("Invalid JSON in {source}: {e}")))
}
