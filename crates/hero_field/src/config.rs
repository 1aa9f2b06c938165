use crate::{error::ConfigError, theme::Theme};
use serde::{Deserialize, Serialize};

/// Host-facing settings for one hero scene.
///
/// Every field has a default so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub theme: Theme,
    /// Upper bound on the particle count before the device budget applies.
    pub requested_particles: u32,
    /// Whether the pointer repels particles.
    pub interactive: bool,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    /// Frame rate the quality governor aims for.
    pub target_fps: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            requested_particles: 1000,
            interactive: true,
            repulsion_radius: 8.0,
            repulsion_strength: 2.0,
            target_fps: 60.0,
        }
    }
}

impl HeroConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(doc)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "target_fps",
                expected: "a positive number",
                value: self.target_fps,
            });
        }
        if !(self.repulsion_radius.is_finite() && self.repulsion_radius > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "repulsion_radius",
                expected: "a positive number",
                value: self.repulsion_radius,
            });
        }
        if !self.repulsion_strength.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "repulsion_strength",
                expected: "finite",
                value: self.repulsion_strength,
            });
        }
        Ok(())
    }
}
