//! Mathematical utilities: the logistic link and the linear predictor.

pub mod linear;
pub mod logistic;

pub use linear::*;
pub use logistic::*;
