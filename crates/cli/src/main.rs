//! `rrf` command-line validator.
//!
//! Validates one or more case files and prints one verdict per file. The process exits with
//! status 1 when any file fails.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rrf_core::{CaseFileValidator, ValidationReport, ValidatorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FAILURE_BANNER: &str = "There are validation failures!";

#[derive(Parser, Debug)]
#[command(name = "rrf")]
#[command(about = "UNHCR RRF case-file validator")]
struct Cli {
    /// Case files to validate
    #[arg(short = 'f', long = "file", required = true, num_args = 1..)]
    files: Vec<PathBuf>,
    /// Only use parsers whose id matches one of these patterns (`v4`, `v*`)
    #[arg(short = 'p', long = "parser", num_args = 1..)]
    parsers: Vec<String>,
    /// Leave the allowed values out of invalid-code messages
    #[arg(long)]
    no_suggestions: bool,
    /// Print one JSON report per line instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("rrf_core=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ValidatorConfig::from_env()?;

    let passed = run(&cli, config, &mut std::io::stdout().lock())?;
    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

/// Validate every file named on the command line.
///
/// # Returns
///
/// `true` when every file passed.
///
/// # Errors
///
/// Returns an error if the reference tables cannot be loaded, no parser matches the
/// `--parser` patterns, or the output cannot be written.
fn run(cli: &Cli, config: ValidatorConfig, out: &mut impl Write) -> anyhow::Result<bool> {
    let config = if cli.no_suggestions {
        config.without_suggestions()
    } else {
        config
    };
    let registry = config
        .load_registry()
        .context("failed to load reference tables")?;
    let validator = CaseFileValidator::new(Arc::new(registry), config);

    let ids = if cli.parsers.is_empty() {
        Vec::new()
    } else {
        validator.select(&cli.parsers)?
    };
    tracing::debug!("validating {} file(s) with parsers {:?}", cli.files.len(), ids);

    let mut passed = true;
    for file in &cli.files {
        let result = validator.validate_file(file, &ids);
        passed &= result.is_success();

        if cli.json {
            writeln!(out, "{}", serde_json::to_string(&ValidationReport::from(&result))?)?;
        } else {
            writeln!(out, "{result}")?;
        }
    }

    if !passed && !cli.json {
        writeln!(out, "{FAILURE_BANNER}")?;
    }
    Ok(passed)
}
