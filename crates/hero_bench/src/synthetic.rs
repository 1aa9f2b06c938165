use crate::config::SimulatedTier;
use hero_field::{CapabilitySource, ProbeError, RenderCapabilities};

/// Capability source that reports a fixed, made-up device.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticDevice {
    tier: SimulatedTier,
}

impl SyntheticDevice {
    pub fn new(tier: SimulatedTier) -> Self {
        Self { tier }
    }
}

impl CapabilitySource for SyntheticDevice {
    fn user_agent(&self) -> Option<String> {
        Some("Mozilla/5.0 (X11; Linux x86_64) hero_bench".to_string())
    }

    fn query(&self) -> Result<RenderCapabilities, ProbeError> {
        let (api_version, max_texture_size, float_textures) = match self.tier {
            SimulatedTier::None => return Err(ProbeError::NoAdapter),
            SimulatedTier::Low => (1, 1024, false),
            SimulatedTier::Medium => (1, 2048, true),
            SimulatedTier::High => (2, 8192, true),
        };
        Ok(RenderCapabilities {
            api_version,
            max_texture_size,
            float_textures,
            instanced_arrays: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_field::{probe, PerformanceTier};

    #[test]
    fn tiers_classify_as_named() {
        let tier = |t| probe(&SyntheticDevice::new(t)).performance_tier;
        assert_eq!(tier(SimulatedTier::High), PerformanceTier::High);
        assert_eq!(tier(SimulatedTier::Medium), PerformanceTier::Medium);
        assert_eq!(tier(SimulatedTier::Low), PerformanceTier::Low);
        assert!(!probe(&SyntheticDevice::new(SimulatedTier::None)).has_context());
    }
}
