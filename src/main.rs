//! CLI entry point for prusa-scout.

use anyhow::{Context, Result};
use clap::Parser;
use scout_core::app::{self, RunConfig};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => Some(app::load_file_config(path)?),
        None => {
            app::load_default_file_config()
                .context("Failed to load default config file")?
                .config
        }
    };

    // Priority: RUST_LOG env var > flags > config file > default (info)
    let default_level = args.default_log_level(file_config.as_ref().and_then(|c| c.verbosity));
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let base = match &file_config {
        Some(file) => RunConfig::default().with_file(file),
        None => RunConfig::default(),
    };
    let config = args.apply(base);
    debug!(?config, from_file = file_config.is_some(), "run configuration resolved");
    info!(keywords = ?config.keywords, zip_code = %config.zip_code, "prusa-scout starting");

    let report = app::run(&config).await?;
    info!(
        listings = report.listings.len(),
        printers = report.summary.categories.printer.count,
        upgrades = report.summary.categories.upgrade.count,
        "done"
    );
    Ok(())
}
