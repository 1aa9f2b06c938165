//! Structure-of-arrays particle state and its generator.

use crate::{
    device::FieldVariant,
    theme::{Rgb, Theme},
};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

pub const SHELL_INNER_RADIUS: f32 = 5.0;
pub const SHELL_OUTER_RADIUS: f32 = 20.0;
pub const MAX_DRIFT: f32 = 0.01;

/// Per-particle state for one generation of the field.
///
/// Rest positions, velocities, colours and pointer weights are written once
/// by the generator. Only the display buffer changes afterwards, and only the
/// update kernel writes it.
#[derive(Debug, Clone)]
pub struct ParticleField {
    rest: Vec<Vec3>,
    display: Vec<Vec3>,
    velocity: Vec<Vec3>,
    color: Vec<Rgb>,
    pointer_weight: Option<Vec<f32>>,
    variant: FieldVariant,
    theme: Theme,
}

impl ParticleField {
    /// Samples `count` particles inside the spherical shell.
    ///
    /// `count` is expected to be clamped to the device budget by the caller.
    pub fn generate<R: Rng>(
        count: u32,
        theme: Theme,
        variant: FieldVariant,
        rng: &mut R,
    ) -> Self {
        let n = count as usize;
        let palette = theme.palette();

        let mut rest = Vec::with_capacity(n);
        let mut velocity = Vec::with_capacity(n);
        let mut color = Vec::with_capacity(n);
        let mut pointer_weight = variant.has_pointer_weights().then(|| Vec::with_capacity(n));

        for _ in 0..n {
            let radius = rng.gen_range(SHELL_INNER_RADIUS..=SHELL_OUTER_RADIUS);
            let theta = rng.gen_range(0.0..TAU);
            let phi = rng.gen_range(-1.0f32..=1.0).acos();
            let (sin_phi, cos_phi) = phi.sin_cos();
            let (sin_theta, cos_theta) = theta.sin_cos();
            rest.push(Vec3::new(
                radius * sin_phi * cos_theta,
                radius * sin_phi * sin_theta,
                radius * cos_phi,
            ));

            velocity.push(Vec3::new(
                rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
                rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
                rng.gen_range(-MAX_DRIFT..=MAX_DRIFT),
            ));

            color.push(palette[rng.gen_range(0..palette.len())]);

            if let Some(weights) = pointer_weight.as_mut() {
                weights.push(rng.gen_range(0.5..=1.0));
            }
        }

        Self {
            display: rest.clone(),
            rest,
            velocity,
            color,
            pointer_weight,
            variant,
            theme,
        }
    }

    /// Builds a field from explicit arrays. Returns `None` when lengths differ.
    pub fn from_parts(
        rest: Vec<Vec3>,
        velocity: Vec<Vec3>,
        color: Vec<Rgb>,
        pointer_weight: Option<Vec<f32>>,
        theme: Theme,
    ) -> Option<Self> {
        let n = rest.len();
        if velocity.len() != n || color.len() != n {
            return None;
        }
        if pointer_weight.as_ref().is_some_and(|w| w.len() != n) {
            return None;
        }
        let variant = if pointer_weight.is_some() {
            FieldVariant::Standard
        } else {
            FieldVariant::Enhanced
        };
        Some(Self {
            display: rest.clone(),
            rest,
            velocity,
            color,
            pointer_weight,
            variant,
            theme,
        })
    }

    pub fn empty(theme: Theme, variant: FieldVariant) -> Self {
        Self {
            rest: Vec::new(),
            display: Vec::new(),
            velocity: Vec::new(),
            color: Vec::new(),
            pointer_weight: variant.has_pointer_weights().then(Vec::new),
            variant,
            theme,
        }
    }

    pub fn len(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest
    }

    /// The buffer hosts upload each frame.
    pub fn display_positions(&self) -> &[Vec3] {
        &self.display
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocity
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.color
    }

    pub fn pointer_weights(&self) -> Option<&[f32]> {
        self.pointer_weight.as_deref()
    }

    pub fn variant(&self) -> FieldVariant {
        self.variant
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn point_size(&self) -> f32 {
        self.variant.point_size()
    }

    /// Split borrow for the kernel: read-only inputs plus the display buffer.
    pub(crate) fn kernel_view(&mut self) -> KernelView<'_> {
        KernelView {
            rest: &self.rest,
            velocity: &self.velocity,
            pointer_weight: self.pointer_weight.as_deref(),
            display: &mut self.display,
        }
    }
}

pub(crate) struct KernelView<'a> {
    pub rest: &'a [Vec3],
    pub velocity: &'a [Vec3],
    pub pointer_weight: Option<&'a [f32]>,
    pub display: &'a mut [Vec3],
}
