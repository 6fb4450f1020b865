use anyhow::{Context, Result};
use clap::Parser;

use textgen::cli::Cli;
use textgen::core::style;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    if let Err(err) = init_logging(level) {
        eprintln!("{}", style::error(&format!("{:#}", err)));
        std::process::exit(1);
    }

    if let Err(err) = cli.run().await {
        eprintln!("{}", style::error(&format!("{:#}", err)));
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber for logging. `RUST_LOG` takes precedence.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
