//! Logistic-regression model implementation.
//!
//! A model variant is data (coefficients + feature schema), so one type
//! serves every packaged model.

pub mod model;

pub use model::*;
