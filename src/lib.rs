//! `fair-logit` library crate.
//!
//! The binary (`fairmodel`) is a thin wrapper around this library so that:
//!
//! - validation and scoring are testable without spawning processes
//! - the HTTP router can be mounted and exercised in-process
//! - each model variant is data (a model file), not code

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod preprocess;
pub mod report;
pub mod schema;
pub mod server;
pub mod validate;
