use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_cli::RunOptions;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flock simulation", long_about = None)]
struct Args {
    /// JSON settings file; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 1000)]
    frames: u64,

    /// Emit a report every N frames
    #[arg(short, long, default_value_t = 100)]
    report_every: u64,

    /// Seed for the initial population
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Override the number of boids from the settings
    #[arg(short, long)]
    boids: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid simulation starting...");

    let mut settings = boid_cli::load_settings(args.config.as_deref())?;
    if let Some(count) = args.boids {
        settings.boid_count = count;
    }

    let options = RunOptions {
        frames: args.frames,
        report_every: args.report_every,
        seed: args.seed,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    boid_cli::run_with(&settings, &options, |report| {
        let line = serde_json::to_string(report)?;
        writeln!(out, "{}", line).context("Failed to write report")?;
        Ok(())
    })
    .context("Simulation error")?;

    Ok(())
}
