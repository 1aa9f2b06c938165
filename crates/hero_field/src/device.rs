//! One-shot device capability probe.
//!
//! The probe never fails: a missing rendering context or any probe error
//! simply lands on [`PerformanceTier::Low`].

use crate::error::ProbeError;

/// What the rendering backend reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCapabilities {
    /// Major version of the 3D API (WebGL 1 vs 2 style).
    pub api_version: u32,
    pub max_texture_size: u32,
    pub float_textures: bool,
    pub instanced_arrays: bool,
}

/// Host-side source of capability information.
pub trait CapabilitySource {
    /// Advisory platform string; `None` when the host has nothing to offer.
    fn user_agent(&self) -> Option<String>;

    /// Queries the rendering context.
    fn query(&self) -> Result<RenderCapabilities, ProbeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PerformanceTier {
    Low,
    Medium,
    High,
}

impl PerformanceTier {
    pub fn classify(caps: Option<&RenderCapabilities>) -> Self {
        let Some(caps) = caps else {
            return Self::Low;
        };
        if caps.api_version >= 2
            && caps.max_texture_size >= 4096
            && caps.float_textures
            && caps.instanced_arrays
        {
            Self::High
        } else if caps.max_texture_size >= 2048 && caps.float_textures {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn particle_budget(self) -> u32 {
        match self {
            Self::High => 1000,
            Self::Medium => 500,
            Self::Low => 200,
        }
    }

    pub fn max_lights(self) -> u32 {
        match self {
            Self::High => 8,
            Self::Medium => 4,
            Self::Low => 2,
        }
    }

    pub fn texture_quality(self) -> f32 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.75,
            Self::Low => 0.5,
        }
    }

    pub fn shadow_quality(self) -> ShadowQuality {
        match self {
            Self::High => ShadowQuality::High,
            Self::Medium => ShadowQuality::Medium,
            Self::Low => ShadowQuality::Off,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowQuality {
    Off,
    Medium,
    High,
}

/// Which particle kernel flavour the device gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVariant {
    /// High tier: larger points, uniform pointer response.
    Enhanced,
    /// Everything else: smaller points, per-particle pointer weights.
    Standard,
}

impl FieldVariant {
    pub fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::High => Self::Enhanced,
            _ => Self::Standard,
        }
    }

    pub fn point_size(self) -> f32 {
        match self {
            Self::Enhanced => 0.08,
            Self::Standard => 0.05,
        }
    }

    pub fn has_pointer_weights(self) -> bool {
        matches!(self, Self::Standard)
    }
}

/// Coarse device classification from the user-agent string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceClass {
    pub is_mobile: bool,
    pub is_ios: bool,
    pub is_android: bool,
    pub is_tablet: bool,
}

impl DeviceClass {
    pub fn from_user_agent(ua: Option<&str>) -> Self {
        let Some(ua) = ua else {
            return Self::default();
        };
        let ua = ua.to_ascii_lowercase();

        let ipad = ua.contains("ipad");
        let is_ios = ipad || ua.contains("iphone") || ua.contains("ipod");
        let is_android = ua.contains("android");
        let is_tablet = ipad || ua.contains("tablet") || (is_android && !ua.contains("mobile"));
        let is_mobile = !is_tablet && (is_ios || is_android || ua.contains("mobi"));

        Self {
            is_mobile,
            is_ios,
            is_android,
            is_tablet,
        }
    }
}

/// Immutable result of [`probe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    pub class: DeviceClass,
    pub performance_tier: PerformanceTier,
    pub particle_budget: u32,
    pub shadow_quality: ShadowQuality,
    pub antialiasing: bool,
    pub post_processing: bool,
    pub max_lights: u32,
    pub texture_quality: f32,
    /// `None` when no rendering context could be obtained.
    pub capabilities: Option<RenderCapabilities>,
}

impl DeviceProfile {
    pub fn from_parts(class: DeviceClass, capabilities: Option<RenderCapabilities>) -> Self {
        let tier = PerformanceTier::classify(capabilities.as_ref());
        Self {
            class,
            performance_tier: tier,
            particle_budget: tier.particle_budget(),
            shadow_quality: tier.shadow_quality(),
            antialiasing: tier != PerformanceTier::Low,
            post_processing: tier == PerformanceTier::High,
            max_lights: tier.max_lights(),
            texture_quality: tier.texture_quality(),
            capabilities,
        }
    }

    /// Whether a 3D context exists at all.
    pub fn has_context(&self) -> bool {
        self.capabilities.is_some()
    }

    pub fn field_variant(&self) -> FieldVariant {
        FieldVariant::for_tier(self.performance_tier)
    }
}

/// Probes the host once. Idempotent for a given source.
pub fn probe(source: &dyn CapabilitySource) -> DeviceProfile {
    let class = DeviceClass::from_user_agent(source.user_agent().as_deref());
    let capabilities = match source.query() {
        Ok(caps) => Some(caps),
        Err(err) => {
            tracing::info!(error = %err, "No 3D context available; using low tier");
            None
        }
    };

    let profile = DeviceProfile::from_parts(class, capabilities);
    tracing::info!(
        tier = profile.performance_tier.name(),
        budget = profile.particle_budget,
        mobile = profile.class.is_mobile,
        tablet = profile.class.is_tablet,
        "Device probed"
    );
    profile
}
