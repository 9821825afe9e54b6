//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::config::RemovalConfig;
use crate::error::Result;

/// Convert CLI arguments to a `RemovalConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build the configuration, keeping the default for any path not given
    pub(crate) fn from_cli(cli: &Cli) -> Result<RemovalConfig> {
        let mut builder = RemovalConfig::builder();
        if let Some(input) = &cli.input {
            builder = builder.input_path(input);
        }
        if let Some(output) = &cli.output {
            builder = builder.output_path(output);
        }
        builder.build()
    }
}
