//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads the model file
//! - serves HTTP or runs a one-shot command

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, PredictArgs, ReportArgs, SampleArgs, ServeArgs};
use crate::domain::ServeConfig;
use crate::error::AppError;

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "fair_logit=info";

/// Entry point for the `fairmodel` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // A bare `fairmodel` (or `fairmodel --port 9000`) serves, like the container entrypoint.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Predict(args) => handle_predict(args),
        Command::Params(args) => handle_params(args),
        Command::Info(args) => handle_info(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn init_tracing() {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let config = serve_config_from_args(&args);
    let model = pipeline::load_model(&config.model_path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(crate::server::serve(config, Arc::new(model)))
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let model = pipeline::load_model(&args.model.model)?;
    let input = crate::io::read_input(args.input.as_deref())?;

    if args.json {
        let scores = model.predict(&input)?;
        println!("{}", to_json(&scores)?);
    } else {
        let scored = model.score(&input)?;
        println!("{}", crate::report::format_predictions(&scored, input.is_batch()));
    }
    Ok(())
}

fn handle_params(args: ReportArgs) -> Result<(), AppError> {
    let model = pipeline::load_model(&args.model.model)?;
    if args.json {
        println!("{}", to_json(&model.input_parameters())?);
    } else {
        println!("{}", crate::report::format_parameters(model.input_parameters()));
    }
    Ok(())
}

fn handle_info(args: ReportArgs) -> Result<(), AppError> {
    let model = pipeline::load_model(&args.model.model)?;
    if args.json {
        println!("{}", to_json(model.metadata())?);
    } else {
        println!("{}", crate::report::format_model_info(&model));
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let model = pipeline::load_model(&args.model.model)?;
    let records = crate::data::sample::generate_records(&model, args.count, args.seed)?;
    println!("{}", to_json(&records)?);
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))
}

pub fn serve_config_from_args(args: &ServeArgs) -> ServeConfig {
    ServeConfig {
        model_path: args.model.model.clone(),
        addr: SocketAddr::new(args.host, args.port),
    }
}

/// Rewrite argv so `fairmodel` defaults to `fairmodel serve`.
///
/// Rules:
/// - `fairmodel`                     -> `fairmodel serve`
/// - `fairmodel --port 9000 ...`     -> `fairmodel serve --port 9000 ...`
/// - `fairmodel --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
    }
    argv
}
