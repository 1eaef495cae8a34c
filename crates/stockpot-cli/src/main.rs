//! Stockpot CLI
//!
//! Command-line interface for the stockpot market simulator.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use stockpot_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine-readable.
    let default_filter = if cli.verbose {
        "info,stockpot_sim=debug,stockpot_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    stockpot_cli::commands::dispatch(cli)
        .await
        .context("stockpot command failed")?;

    Ok(())
}
