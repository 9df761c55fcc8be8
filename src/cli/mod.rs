//! Command-line parsing for the model scoring service.
//!
//! Argument parsing and command dispatch stay separate from validation and
//! scoring; handlers live in `crate::app`.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fairmodel", version, about = "Validated scoring for FAIR logistic-regression models")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the model over HTTP (`/`, `/predict`, `/input_parameters`).
    Serve(ServeArgs),
    /// Score records read from a file or stdin.
    Predict(PredictArgs),
    /// List the model's input parameters and their constraints.
    Params(ReportArgs),
    /// Show model identity, provenance, and coefficients.
    Info(ReportArgs),
    /// Generate random valid records for the model.
    Sample(SampleArgs),
}

/// Model selection, shared by every command.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Model definition file (JSON).
    #[arg(short = 'm', long = "model", env = "MODEL_FILE", value_name = "JSON")]
    pub model: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8000)]
    pub port: u16,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Input records (a JSON object or list); `-` or omitted reads stdin.
    #[arg(short = 'i', long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Print the response body the HTTP service would return.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of records to generate.
    #[arg(short = 'n', long = "count", default_value_t = 10)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
