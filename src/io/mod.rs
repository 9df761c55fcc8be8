//! Input/output helpers.
//!
//! - model definition files (`model_file`)
//! - request records from files or stdin (`input`)

pub mod input;
pub mod model_file;

pub use input::*;
pub use model_file::*;
