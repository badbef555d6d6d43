//! Polaroid PNG binary entry point.
//!
//! Thin wrapper around the polaroid-cli library that:
//! 1. Initializes logging
//! 2. Parses and validates command-line arguments
//! 3. Runs the selected subcommand

use anyhow::Result;
use polaroid_cli::Cli;

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the command report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::from_args();
    tracing::debug!("Configuration loaded: {:?}", cli);

    cli.validate()?;
    polaroid_cli::run(&cli, &mut std::io::stdout().lock())?;

    Ok(())
}
