//! Command-line interface for stepview
//! Renders a STEP exchange file through one of the registered formats, or looks up a record.
//!
//! Usage:
//!   stepview `<path>` [--format `<format>`] [--config `<file>`] [--split-mode `<mode>`]
//!   stepview `<path>` --lookup `<id>`                     - Print the line declaring #id
//!   stepview --list-formats                              - List all available formats

use anyhow::{anyhow, bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::path::PathBuf;
use stepview_config::{load_layered, StepviewConfig};
use stepview_parser::step::formats::FormatRegistry;
use stepview_parser::step::{Session, SplitMode};

/// Env var holding the tracing filter directives
const LOG_ENV: &str = "STEPVIEW_LOG";

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn build_command() -> Command {
    Command::new("stepview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting STEP exchange files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the exchange file")
                .required_unless_present("list-formats")
                .index(1)
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from config: treeviz)"),
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
            Arg::new("split-mode")
                .long("split-mode")
                .help("How quoted strings interact with delimiters")
                .value_parser(["naive", "quote-aware"]),
        )
        .arg(
            Arg::new("lookup")
                .long("lookup")
                .help("Print the line declaring this record identifier")
                .value_parser(value_parser!(u64))
                .conflicts_with("format"),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
}

fn run() -> Result<()> {
    let matches = build_command().get_matches();
    init_tracing();

    let config = load_config(&matches)?;
    let registry = FormatRegistry::with_defaults(config.output.render_options());

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return Ok(());
    }

    let path = matches
        .get_one::<PathBuf>("path")
        .ok_or_else(|| anyhow!("a path is required"))?;
    let session = Session::new(config.tokenizer.split_mode);
    let doc = session.load_file(path)?;

    if let Some(&identifier) = matches.get_one::<u64>("lookup") {
        let line = doc
            .lookup(identifier)
            .and_then(|index| doc.line(index))
            .ok_or_else(|| anyhow!("identifier #{identifier} not found"))?;
        println!("{}\t{}", line.index + 1, line.text);
        return Ok(());
    }

    let format = &config.output.format;
    if !registry.has(format) {
        bail!(
            "unknown format '{format}' (available: {})",
            registry.list_formats().join(", ")
        );
    }
    let output = registry
        .serialize(&doc, format)
        .with_context(|| format!("cannot render {} as {format}", path.display()))?;
    print!("{output}");
    Ok(())
}

/// Defaults, `stepview.toml` in the working directory, `--config`, then flags
fn load_config(matches: &ArgMatches) -> Result<StepviewConfig> {
    let explicit = matches.get_one::<PathBuf>("config");
    let mut config = load_layered(explicit.map(PathBuf::as_path))
        .context("failed to load configuration")?;
    if let Some(format) = matches.get_one::<String>("format") {
        config.output.format = format.clone();
    }
    if let Some(mode) = matches.get_one::<String>("split-mode") {
        config.tokenizer.split_mode = match mode.as_str() {
            "quote-aware" => SplitMode::QuoteAware,
            _ => SplitMode::Naive,
        };
    }
    Ok(config)
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Some(formatter) = registry.get(&name) {
            println!("  {}", name);
            println!("    {}", formatter.description());
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let matches = build_command()
            .try_get_matches_from([
                "stepview",
                "x.stp",
                "-f",
                "tokens-simple",
                "--split-mode",
                "quote-aware",
            ])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.output.format, "tokens-simple");
        assert_eq!(config.tokenizer.split_mode, SplitMode::QuoteAware);
    }
}
