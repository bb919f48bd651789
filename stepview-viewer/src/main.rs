//! Standalone binary for the stepview interactive viewer.
//! Usage:
//!   stepv <path> [--config <file>] [--log <file>]

mod viewer;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command, ValueHint};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Env var holding the tracing filter directives
const LOG_ENV: &str = "STEPVIEW_LOG";

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = Command::new("stepv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive terminal viewer for STEP exchange files")
        .arg(
            Arg::new("path")
                .help("Path to the exchange file to open")
                .required(true)
                .index(1)
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .help("Write diagnostics to this file")
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .get_matches();

    if let Some(log_path) = matches.get_one::<PathBuf>("log") {
        init_file_logging(log_path)?;
    }

    let config = stepview_config::load_layered(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
    )
    .context("failed to load configuration")?;

    let path = matches
        .get_one::<PathBuf>("path")
        .cloned()
        .context("a path is required")?;
    viewer::viewer::run_viewer(path, &config)?;
    Ok(())
}

/// The terminal belongs to the UI, so diagnostics only ever go to a file
fn init_file_logging(path: &Path) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .init();
    Ok(())
}
