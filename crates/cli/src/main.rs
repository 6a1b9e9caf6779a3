//! File type detection CLI
//!
//! Classifies files, directories and standard input by content using an
//! ONNX file type model.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::predict;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Content-based file type detection
#[derive(Parser)]
#[command(name = "ftype")]
#[command(author, version, about = "Detect file types from their content", long_about = None)]
pub struct Cli {
    /// ONNX model file (overrides FTYPE_MODEL_PATH)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Model configuration JSON (defaults to config.json next to the model)
    #[arg(long, global = true)]
    pub model_config: Option<PathBuf>,

    /// Expected SHA-256 of the model file
    #[arg(long, global = true)]
    pub model_sha256: Option<String>,

    /// Settings file (defaults to ~/.config/ftype/config.{toml,json})
    #[arg(long, global = true, env = "FTYPE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the type of one or more files
    File {
        /// Files to classify (directories are skipped)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Predict the type of every file in a directory
    Dir {
        /// Directory to scan
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(long, short)]
        recursive: bool,
    },

    /// Predict the type of data read from standard input
    Stdin,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = config::Settings::load(cli.settings.as_deref())?.with_overrides(
        cli.model,
        cli.model_config,
        cli.model_sha256,
    );
    debug!(
        model = ?settings.model_path,
        model_config = ?settings.resolved_config_path(),
        checksum_pinned = settings.model_sha256.is_some(),
        "Resolved settings"
    );
    let predictor = settings.build_predictor()?;

    match cli.command {
        Commands::File { paths } => predict::predict_files(&predictor, &paths, cli.format),
        Commands::Dir { path, recursive } => {
            predict::predict_directory(&predictor, &path, recursive, cli.format)
        }
        Commands::Stdin => predict::predict_stdin(&predictor, cli.format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
