//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the feature schema (`FeatureSpec`, `NumericRange`, `Category`, `Remap`)
//! - the linear model coefficients (`ModelSpec`) and card (`ModelMetadata`)
//! - request/response shapes (`Input`, `Scores`)
//! - service configuration (`ServeConfig`)

pub mod types;

pub use types::*;
