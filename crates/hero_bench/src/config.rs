use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use hero_field::{HeroConfig, Theme};
use std::path::PathBuf;

/// `hero_bench` - drives the hero scene headlessly with synthetic frame timing.
///
/// Useful for watching the quality governor react to a scripted frame-rate
/// profile and for checking particle budgets per device tier without a GPU.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// JSON file with base scene settings; flags below override it.
    #[arg(long, env = "HERO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Theme palette (light, dark, neon, minimal). Unknown names use light.
    #[arg(long, env = "HERO_THEME")]
    pub theme: Option<String>,

    /// Requested particle count before the device budget applies.
    #[arg(long, env = "HERO_PARTICLES")]
    pub particles: Option<u32>,

    /// Whether the synthetic pointer repels particles.
    #[arg(long, env = "HERO_INTERACTIVE")]
    pub interactive: Option<bool>,

    /// Simulated device tier; `none` means no rendering context at all.
    #[arg(long, value_enum, default_value_t = SimulatedTier::High, env = "HERO_TIER")]
    pub tier: SimulatedTier,

    /// Frame-rate schedule as `fps:seconds` segments, e.g. `30:3,60:5`.
    #[arg(long, default_value = "60:5", env = "HERO_SCHEDULE")]
    pub schedule: String,

    /// Seed for field generation.
    #[arg(long, default_value_t = 1, env = "HERO_SEED")]
    pub seed: u64,

    /// Where to write the JSON report; stdout when omitted.
    #[arg(long, env = "HERO_REPORT")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SimulatedTier {
    None,
    Low,
    Medium,
    High,
}

impl Config {
    /// Base settings from `--config`, then individual flag overrides.
    pub fn hero_config(&self) -> anyhow::Result<HeroConfig> {
        let mut hero = match &self.config {
            Some(path) => {
                let doc = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                HeroConfig::from_json_str(&doc)?
            }
            None => HeroConfig::default(),
        };
        if let Some(theme) = &self.theme {
            hero.theme = Theme::from_name(theme);
        }
        if let Some(particles) = self.particles {
            hero.requested_particles = particles;
        }
        if let Some(interactive) = self.interactive {
            hero.interactive = interactive;
        }
        Ok(hero)
    }
}

/// One constant-rate stretch of the schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub fps: f64,
    pub seconds: f64,
}

pub fn parse_schedule(schedule: &str) -> anyhow::Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for part in schedule.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((fps, seconds)) = part.split_once(':') else {
            bail!("schedule segment '{part}' is not fps:seconds");
        };
        let fps: f64 = fps
            .trim()
            .parse()
            .with_context(|| format!("bad fps in '{part}'"))?;
        let seconds: f64 = seconds
            .trim()
            .parse()
            .with_context(|| format!("bad duration in '{part}'"))?;
        if !(fps > 0.0 && fps.is_finite()) || !(seconds > 0.0 && seconds.is_finite()) {
            bail!("schedule segment '{part}' must have positive fps and duration");
        }
        segments.push(Segment { fps, seconds });
    }
    if segments.is_empty() {
        bail!("schedule is empty");
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(fps: f64, seconds: f64) -> Segment {
        Segment { fps, seconds }
    }

    #[test]
    fn parses_multi_segment_schedule() {
        let s = parse_schedule("30:3, 60:5").unwrap();
        assert_eq!(s, vec![seg(30.0, 3.0), seg(60.0, 5.0)]);
    }

    #[test]
    fn rejects_malformed_segments() {
        assert!(parse_schedule("").is_err());
        assert!(parse_schedule("30").is_err());
        assert!(parse_schedule("0:3").is_err());
        assert!(parse_schedule("30:abc").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::parse_from([
            "hero_bench",
            "--theme",
            "neon",
            "--particles",
            "250",
            "--tier",
            "medium",
        ]);
        let hero = cfg.hero_config().unwrap();
        assert_eq!(hero.theme, Theme::Neon);
        assert_eq!(hero.requested_particles, 250);
        assert!(hero.interactive);
        assert_eq!(cfg.tier, SimulatedTier::Medium);
    }
}
