//! Shared model-loading logic used by every command.
//!
//! model file -> card (inline or registry fetch) -> schema + overrides -> `LogisticModel`
//!
//! Loading is synchronous and happens before any async runtime starts, so the
//! blocking registry client is safe to use here.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::data::registry::RegistryClient;
use crate::error::AppError;
use crate::io::{ModelFile, build_model, read_model_file};
use crate::models::LogisticModel;

/// Load and validate the model described by `path`.
pub fn load_model(path: &Path) -> Result<LogisticModel, AppError> {
    let file = read_model_file(path)?;
    let card = resolve_card(&file)?;
    let model = build_model(&file, &card)?;

    info!(
        model = %model.metadata().model_name,
        uri = %model.metadata().model_uri,
        features = model.schema().len(),
        "model loaded"
    );
    Ok(model)
}

fn resolve_card(file: &ModelFile) -> Result<Value, AppError> {
    match (&file.metadata, &file.metadata_url) {
        (Some(card), _) => Ok(card.clone()),
        (None, Some(url)) => RegistryClient::from_env().fetch_model_card(url),
        (None, None) => Err(AppError::new(
            2,
            format!("Model '{}' has neither metadata nor metadata_url.", file.model_name),
        )),
    }
}
