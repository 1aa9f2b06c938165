use anyhow::Context;
use clap::Parser;
use hero_field::{HeroConfig, Theme};
use std::path::PathBuf;

/// `hero_viewer` - interactive particle field hero scene.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct ViewerArgs {
    /// JSON file with base scene settings; flags below override it.
    #[arg(long, env = "HERO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Theme palette (light, dark, neon, minimal). Unknown names use light.
    #[arg(long, env = "HERO_THEME")]
    pub theme: Option<String>,

    /// Requested particle count before the device budget applies.
    #[arg(long, env = "HERO_PARTICLES")]
    pub particles: Option<u32>,

    /// Whether the pointer repels particles.
    #[arg(long, env = "HERO_INTERACTIVE")]
    pub interactive: Option<bool>,

    /// Frame rate the quality governor aims for.
    #[arg(long, env = "HERO_TARGET_FPS")]
    pub target_fps: Option<f32>,

    /// Skip the 3D scene and show the static backdrop.
    #[arg(long, env = "HERO_NO_3D")]
    pub no_3d: bool,
}

impl ViewerArgs {
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
        if let Some(fps) = self.target_fps {
            hero.target_fps = fps;
        }
        hero.validate()?;
        Ok(hero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let args = ViewerArgs {
            theme: Some("sepia".into()),
            ..Default::default()
        };
        assert_eq!(args.hero_config().unwrap().theme, Theme::Light);
    }

    #[test]
    fn invalid_target_fps_is_rejected() {
        let args = ViewerArgs {
            target_fps: Some(0.0),
            ..Default::default()
        };
        assert!(args.hero_config().is_err());
    }

    #[test]
    fn flags_parse() {
        let args = ViewerArgs::parse_from(["hero_viewer", "--theme", "dark", "--no-3d"]);
        assert!(args.no_3d);
        assert_eq!(args.hero_config().unwrap().theme, Theme::Dark);
    }
}
