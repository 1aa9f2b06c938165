//! Scene composition: one field, one governor, camera follow and the floating
//! geometry layer, advanced together once per frame.

use crate::{
    camera::CameraFollow,
    config::HeroConfig,
    device::DeviceProfile,
    field::ParticleField,
    geometry::FloatingGeometry,
    kernel::{self, KernelParams, PointerState},
    quality::{QualityBucket, QualityGovernor},
    theme::Theme,
};
use glam::{EulerRot, Mat4, Vec2};
use rand::{rngs::StdRng, SeedableRng};

/// Whole-field spin in radians per second, (x, y).
const FIELD_SPIN: Vec2 = Vec2::new(0.05, 0.1);

/// Timing supplied by the host render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Monotonic timestamp in milliseconds.
    pub now_ms: f64,
    /// Wall-clock seconds since the previous frame.
    pub delta_s: f32,
}

impl FrameTick {
    /// Non-finite or negative deltas count as a zero-length frame.
    fn delta(&self) -> f32 {
        if self.delta_s.is_finite() && self.delta_s > 0.0 {
            self.delta_s
        } else {
            0.0
        }
    }
}

pub struct HeroScene {
    config: HeroConfig,
    profile: DeviceProfile,
    governor: QualityGovernor,
    bucket: QualityBucket,
    field: ParticleField,
    geometry: FloatingGeometry,
    camera: CameraFollow,
    rotation: Vec2,
    clock_origin_ms: Option<f64>,
    elapsed_s: f32,
    epoch: u64,
    rng: StdRng,
}

impl HeroScene {
    pub fn new(config: HeroConfig, profile: DeviceProfile, seed: u64) -> Self {
        let mut scene = Self {
            governor: QualityGovernor::new(config.target_fps),
            bucket: QualityBucket::FULL,
            field: ParticleField::empty(config.theme, profile.field_variant()),
            geometry: FloatingGeometry::new(config.theme),
            camera: CameraFollow::default(),
            rotation: Vec2::ZERO,
            clock_origin_ms: None,
            elapsed_s: 0.0,
            epoch: 0,
            rng: StdRng::seed_from_u64(seed),
            config,
            profile,
        };
        scene.regenerate();
        scene
    }

    /// Particle count for the current bucket, requested count and budget.
    pub fn target_particle_count(&self) -> u32 {
        self.config
            .requested_particles
            .min(self.profile.particle_budget)
            .min(self.bucket.particle_count())
    }

    fn regenerate(&mut self) {
        let count = self.target_particle_count();
        self.field = ParticleField::generate(
            count,
            self.config.theme,
            self.profile.field_variant(),
            &mut self.rng,
        );
        self.epoch += 1;
        tracing::debug!(
            count,
            theme = %self.config.theme,
            bucket = self.bucket.tenths(),
            epoch = self.epoch,
            "Particle field regenerated"
        );
    }

    /// Advances the whole scene by one frame.
    pub fn tick(&mut self, tick: FrameTick, pointer: PointerState) {
        let quality = self.governor.update(tick.now_ms);
        let bucket = QualityBucket::from_level(quality);
        if bucket != self.bucket {
            let before = self.target_particle_count();
            self.bucket = bucket;
            // Budget or request may already cap the count below both buckets.
            if self.target_particle_count() != before {
                self.regenerate();
            }
        }

        let origin = *self.clock_origin_ms.get_or_insert(tick.now_ms);
        let t = ((tick.now_ms - origin) / 1000.0) as f32;
        self.elapsed_s = self.elapsed_s.max(t);
        let dt = tick.delta();

        let params = self.kernel_params();
        kernel::advance(&mut self.field, self.elapsed_s, pointer, params);
        self.rotation += FIELD_SPIN * dt;

        self.geometry.advance(self.elapsed_s, dt, pointer);
        self.camera.advance(pointer, dt);
    }

    pub fn kernel_params(&self) -> KernelParams {
        KernelParams {
            interactive: self.config.interactive,
            repulsion_radius: self.config.repulsion_radius,
            repulsion_strength: self.config.repulsion_strength,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.config.theme {
            return;
        }
        self.config.theme = theme;
        self.geometry = FloatingGeometry::new(theme);
        self.regenerate();
    }

    pub fn set_requested_particles(&mut self, count: u32) {
        let before = self.target_particle_count();
        self.config.requested_particles = count;
        if self.target_particle_count() != before {
            self.regenerate();
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.config.interactive = interactive;
    }

    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn governor(&self) -> &QualityGovernor {
        &self.governor
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn geometry(&self) -> &FloatingGeometry {
        &self.geometry
    }

    pub fn camera(&self) -> &CameraFollow {
        &self.camera
    }

    /// Bumped on every field regeneration; static attributes need re-upload.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed_s
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    /// Rigid whole-field rotation applied on top of the particle positions.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }
}
