//! tatl-ingest - Transatlantic flight ledger ingest
//!
//! Pulls the latest arrivals and departures for the configured airport,
//! normalizes them against the reference tables, and merges anything
//! new into the flight ledger. One invocation is one run; scheduling is
//! external (cron or equivalent).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tatl_common::config::Config;
use tatl_ingest::pipeline::IngestPipeline;
use tatl_ingest::report;

#[derive(Parser, Debug)]
#[command(name = "tatl-ingest", about = "Transatlantic flight ledger ingest", version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "tatl.toml")]
    config: PathBuf,

    /// Override the watched airport (ICAO code)
    #[arg(long)]
    airport: Option<String>,

    /// Override the ledger file path
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(airport) = args.airport {
        config.airport = airport;
    }
    if let Some(ledger) = args.ledger {
        config.data.ledger = ledger;
    }
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting tatl-ingest");
    info!("Airport: {}", config.airport);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let fetched_at = tatl_common::time::now_local(config.tz()?);
    report::print_header(&fetched_at);

    let pipeline = IngestPipeline::from_config(config)?;
    let outcome = pipeline.run().await?;

    report::print_outcome(&outcome);

    Ok(())
}
