use std::path::Path;

use anyhow::{bail, Context, Result};
use boid_core::{spawn_population, FlockStd};
use boid_shared::{FlockSettings, FrameReport};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How long to run and how often to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub frames: u64,
    pub report_every: u64,
    pub seed: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 1000,
            report_every: 100,
            seed: 0,
        }
    }
}

/// Reads settings from a JSON file, or returns the defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<FlockSettings> {
    let Some(path) = path else {
        log::info!("No config file given, using default settings");
        return Ok(FlockSettings::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let settings = FlockSettings::from_json(&json)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Spawns the population described by `settings`, seeded for reproducible runs.
pub fn build_flock(settings: &FlockSettings, seed: u64) -> Result<FlockStd> {
    settings.validate().context("Invalid settings")?;
    if settings.boid_count == 0 {
        bail!("Nothing to simulate: boid_count is 0");
    }

    let params = settings.params()?;
    let search = settings.search()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let boids = spawn_population(&mut rng, &settings.layout(), &params);

    Ok(FlockStd::with_boids(params, search, boids))
}

/// Steps the flock, handing a report to `on_report` every `report_every`
/// frames and after the last frame.
pub fn run_with<F>(settings: &FlockSettings, options: &RunOptions, mut on_report: F) -> Result<()>
where
    F: FnMut(&FrameReport) -> Result<()>,
{
    if options.report_every == 0 {
        bail!("report interval must be at least 1 frame");
    }

    let mut flock = build_flock(settings, options.seed)?;
    log::info!(
        "Running {} boids for {} frames (seed {})",
        flock.len(),
        options.frames,
        options.seed
    );

    if options.frames == 0 {
        return on_report(&FrameReport::new(0, &flock.stats()));
    }

    while flock.frame() < options.frames {
        flock.step();
        let frame = flock.frame();
        if frame % options.report_every == 0 || frame == options.frames {
            let report = FrameReport::new(frame, &flock.stats());
            log::debug!("Frame {}: mean speed {:.3}", frame, report.mean_speed);
            on_report(&report)?;
        }
    }

    log::info!("Finished after {} frames", flock.frame());
    Ok(())
}

/// Runs to completion and collects every report.
pub fn run(settings: &FlockSettings, options: &RunOptions) -> Result<Vec<FrameReport>> {
    let mut reports = Vec::new();
    run_with(settings, options, |report| {
        reports.push(report.clone());
        Ok(())
    })?;
    Ok(reports)
}
