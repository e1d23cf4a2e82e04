//! cinemelt: normalize the movie dataset into relational tables
//!
//! Usage:
//!   cinemelt <destination>
//!
//! Sources are read from `$CINEMELT_SOURCE_DIR` (default `movie-data/`);
//! every table is written to `<destination>/<table>/`.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use cinemelt::{Config, SourceSet};
use clap::Parser;
use tracing::info;

const USAGE: &str = "Usage: cinemelt <destination>";

#[derive(Parser, Debug)]
#[command(name = "cinemelt")]
#[command(about = "Normalize the movie dataset into relational tables", long_about = None)]
#[command(disable_help_flag = true)]
struct Args {
    /// Base destination; each table is written to <DESTINATION>/<table>/
    #[arg(value_name = "DESTINATION")]
    destination: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Exactly one positional argument; anything else is a usage error
    let Ok(args) = Args::try_parse() else {
        eprintln!("{}", USAGE);
        std::process::exit(-1);
    };

    let config = Config::new(args.destination, SourceSet::from_env())
        .context("Invalid configuration")?;
    info!(destination = %config.destination.display(), "starting export");

    let written = cinemelt::process_all(&config).context("Export failed")?;
    let rows: usize = written.iter().map(|t| t.rows).sum();
    info!(tables = written.len(), rows, "done");

    Ok(())
}
