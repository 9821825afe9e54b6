//! Background Removal CLI Tool
//!
//! Running without arguments removes the background from the default
//! profile image. Status lines go to stdout, diagnostics to stderr.

use super::config::CliConfigBuilder;
use crate::{
    processor::SegmentationRemover,
    remover::BackgroundRemover,
    services::{ConsoleStatusReporter, StatusReporter},
    tracing_config::init_cli_tracing,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Remove the background from an image
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "remove-bg")]
pub struct Cli {
    /// Image to process [default: frontend/public/images/profile.png]
    #[arg(short, long, value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Where to write the transparent PNG [default: frontend/public/images/profile_transparent.png]
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse arguments, run the pipeline once and map the outcome to an exit code
///
/// # Errors
/// - Tracing subscriber cannot be installed
pub fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;
    tracing::debug!(?cli, "Parsed arguments");

    let mut reporter = ConsoleStatusReporter::stdout();
    let succeeded = run(&cli, &mut reporter);

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Returns `true` when the output image was written
fn run<R: StatusReporter>(cli: &Cli, reporter: &mut R) -> bool {
    let config = match CliConfigBuilder::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            let input = cli.input.clone().unwrap_or_default();
            reporter.report_failure(&input, &e);
            return false;
        },
    };

    let capability = match SegmentationRemover::u2net() {
        Ok(capability) => capability,
        Err(e) => {
            reporter.report_start(&config.input_path);
            reporter.report_failure(&config.input_path, &e);
            return false;
        },
    };

    BackgroundRemover::new(config, capability).run(reporter).is_ok()
}
