//! External data sources.
//!
//! - `registry`: model cards fetched from a FAIR model registry
//! - `sample`: synthetic request records drawn from a model's schema

pub mod registry;
pub mod sample;
