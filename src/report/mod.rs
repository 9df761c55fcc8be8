//! Terminal output for the CLI commands.

mod format;

pub use format::*;
