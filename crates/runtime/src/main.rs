#![deny(clippy::all, clippy::pedantic)]
//! # Runtime
//!
//! Drives a game environment with uniformly random actions.
//!
//! ```text
//! runtime_main --config arena.json --steps 500
//! runtime_main --dry-run --steps 50 --seed 7
//! ```
//!
//! Real input and capture need the `desktop` feature. `--dry-run` swaps every
//! OS capability for the recording fakes, so it runs anywhere.

mod driver;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "runtime_main", about = "Random-action driver for the game environment")]
struct Cli {
    /// Environment config (JSON). Optional with --dry-run.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of environment steps to take.
    #[arg(long, default_value_t = 100)]
    steps: u64,

    /// Seed for the random action generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Replace input, capture, window discovery and process launch with fakes.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match (&cli.config, cli.dry_run) {
        (Some(path), _) => gym::EnvConfig::from_path(path)?,
        (None, true) => driver::dry_run_config(),
        (None, false) => bail!("--config is required unless --dry-run is given"),
    };

    if let Some(seed) = cli.seed {
        fastrand::seed(seed);
    }

    let summary = if cli.dry_run {
        driver::run_dry(config, cli.steps)?
    } else {
        driver::run_desktop(config, cli.steps)?
    };
    tracing::info!(
        steps = summary.steps,
        episodes = summary.episodes,
        "Run finished"
    );
    println!("steps={} episodes={}", summary.steps, summary.episodes);
    Ok(())
}
