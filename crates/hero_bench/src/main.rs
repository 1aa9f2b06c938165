mod clock;
mod config;
mod report;
mod synthetic;

use crate::clock::SyntheticClock;
use crate::config::{parse_schedule, Config};
use crate::report::Report;
use crate::synthetic::SyntheticDevice;
use anyhow::Context;
use clap::Parser;
use hero_field::{FrameOutput, HeroShell, PointerState};
use std::io::Write;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();
    let config = Config::parse();
    tracing::info!(config = ?config, "Bench starting with configuration");

    let hero = config.hero_config()?;
    let schedule = parse_schedule(&config.schedule)?;
    let device = SyntheticDevice::new(config.tier);

    let mut shell = HeroShell::mount_seeded((), hero, &device, config.seed);
    let mut report = Report::new(&shell);

    for segment in &schedule {
        tracing::info!(fps = segment.fps, seconds = segment.seconds, "Scheduled segment");
    }

    let mut clock = SyntheticClock::new(&schedule);
    let mut next_sample_ms = 1000.0_f64;
    let mut second = 0_u32;

    while let Some(tick) = clock.next() {
        // Slow orbit so repulsion is exercised.
        let t = (tick.now_ms / 1000.0) as f32;
        let (sin, cos) = (t * 0.7).sin_cos();
        let pointer = PointerState::new(0.5 + 0.4 * cos, 0.5 + 0.4 * sin);
        if let FrameOutput::Backdrop(_) = shell.tick(tick, pointer) {
            tracing::debug!("No scene; showing backdrop");
        }
        report.frames += 1;

        while clock.now_ms() >= next_sample_ms {
            second += 1;
            report.sample(&shell, second);
            next_sample_ms += 1000.0;
        }
    }

    if let Some(last) = report.samples.last() {
        tracing::info!(
            quality = last.quality,
            particles = last.particles,
            regenerations = last.epoch,
            "Bench finished"
        );
    } else {
        tracing::info!(state = report.state, "Bench finished without a scene");
    }

    let json = serde_json::to_string_pretty(&report)?;
    match &config.report {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}
