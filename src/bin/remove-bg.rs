//! remove-bg CLI entry point

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    remove_bg::cli::main()
}
