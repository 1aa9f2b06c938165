//! Per-frame particle update.
//!
//! Each display position is recomputed from scratch out of the rest position,
//! an index-phased floating offset, a linear drift and an optional pointer
//! repulsion. Nothing is accumulated between frames except through `t`, so
//! the kernel is correct for any frame pacing.

use crate::field::{KernelView, ParticleField};
use glam::{Vec2, Vec3};

/// Half-extent of the world square the normalised pointer maps onto.
pub const POINTER_WORLD_SCALE: f32 = 20.0;

/// Normalised pointer position; `{0.5, 0.5}` means centred / no pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::CENTER
    }
}

impl PointerState {
    pub const CENTER: PointerState = PointerState { x: 0.5, y: 0.5 };

    /// Builds a pointer from normalised coordinates, clamped to `[0, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
        Self {
            x: clamp(x),
            y: clamp(y),
        }
    }

    /// World-space point on the z = 0 plane under the pointer.
    pub fn world(self) -> Vec3 {
        Vec3::new(
            (self.x - 0.5) * POINTER_WORLD_SCALE,
            (self.y - 0.5) * POINTER_WORLD_SCALE,
            0.0,
        )
    }

    pub fn world_xy(self) -> Vec2 {
        self.world().truncate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParams {
    pub interactive: bool,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            interactive: true,
            repulsion_radius: 8.0,
            repulsion_strength: 2.0,
        }
    }
}

/// Pseudo-periodic offset for particle `index` at time `t`.
#[inline]
pub fn float_offset(t: f32, index: usize) -> Vec3 {
    let i = index as f32;
    Vec3::new(
        (t * 0.5 + i * 0.1).sin() * 0.5,
        (t * 0.3 + i * 0.15).cos() * 0.3,
        (t * 0.4 + i * 0.2).sin() * 0.4,
    )
}

/// Linear falloff: 1 at the centre, 0 at and beyond `radius`.
#[inline]
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if distance >= radius {
        0.0
    } else {
        (radius - distance) / radius
    }
}

/// Advances every display position for elapsed time `t` (seconds).
///
/// O(N), no allocation. Rest, velocity and weights are only read.
pub fn advance(field: &mut ParticleField, t: f32, pointer: PointerState, params: KernelParams) {
    let KernelView {
        rest,
        velocity,
        pointer_weight,
        display,
    } = field.kernel_view();
    let mouse = pointer.world();
    let radius = params.repulsion_radius;

    for (i, (out, (&rest, &velocity))) in display
        .iter_mut()
        .zip(rest.iter().zip(velocity))
        .enumerate()
    {
        let mut candidate = rest + float_offset(t, i) + velocity * t;

        if params.interactive {
            let away = candidate - mouse;
            let d = away.length();
            // d == 0 leaves the particle unrepelled this frame.
            if d > 0.0 && d < radius {
                let weight = pointer_weight.map_or(1.0, |w| w[i]);
                let force = falloff(d, radius) * weight;
                candidate += (away / d) * force * params.repulsion_strength;
            }
        }

        *out = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{device::FieldVariant, theme::Theme};
    use rand::{rngs::StdRng, SeedableRng};

    fn single(rest: Vec3) -> ParticleField {
        ParticleField::from_parts(vec![rest], vec![Vec3::ZERO], vec![[1.0; 3]], None, Theme::Light)
            .unwrap()
    }

    fn still() -> KernelParams {
        KernelParams {
            interactive: false,
            ..KernelParams::default()
        }
    }

    #[test]
    fn regression_fixture_at_time_zero() {
        let mut field = single(Vec3::new(10.0, 0.0, 0.0));
        advance(&mut field, 0.0, PointerState::CENTER, still());
        assert_eq!(field.display_positions()[0], Vec3::new(10.0, 0.3, 0.0));
    }

    #[test]
    fn displacement_without_drift_is_bounded() {
        let bound = (0.5f32 * 0.5 + 0.3 * 0.3 + 0.4 * 0.4).sqrt() + 1e-5;
        let rest: Vec<Vec3> = (0..64).map(|i| Vec3::splat(i as f32)).collect();
        let n = rest.len();
        let mut field = ParticleField::from_parts(
            rest,
            vec![Vec3::ZERO; n],
            vec![[0.0; 3]; n],
            None,
            Theme::Dark,
        )
        .unwrap();

        for step in 0..200 {
            let t = step as f32 * 0.37;
            advance(&mut field, t, PointerState::new(0.9, 0.1), still());
            for (d, r) in field.display_positions().iter().zip(field.rest_positions()) {
                assert!((*d - *r).length() <= bound);
            }
        }
    }

    #[test]
    fn static_attributes_are_never_written() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = ParticleField::generate(300, Theme::Neon, FieldVariant::Standard, &mut rng);
        let rest = field.rest_positions().to_vec();
        let velocity = field.velocities().to_vec();
        let color = field.colors().to_vec();
        let weights = field.pointer_weights().map(<[f32]>::to_vec);

        for step in 0..50 {
            let pointer = PointerState::new(step as f32 / 50.0, 0.3);
            advance(&mut field, step as f32 * 0.1, pointer, KernelParams::default());
        }

        assert_eq!(field.rest_positions(), rest.as_slice());
        assert_eq!(field.velocities(), velocity.as_slice());
        assert_eq!(field.colors(), color.as_slice());
        assert_eq!(field.pointer_weights().map(<[f32]>::to_vec), weights);
    }

    /// Candidate at t = 0, i = 0 is rest + (0, 0.3, 0); rest (d, -0.3, 0)
    /// puts it at distance d from a centred pointer.
    fn pushed_distance(d: f32) -> f32 {
        let mut field = single(Vec3::new(d, -0.3, 0.0));
        advance(&mut field, 0.0, PointerState::CENTER, KernelParams::default());
        field.display_positions()[0].x - d
    }

    #[test]
    fn repulsion_falls_off_with_distance() {
        let near = pushed_distance(2.0);
        let mid = pushed_distance(5.0);
        assert!(near >= mid && mid > 0.0);
        assert!((near - (8.0 - 2.0) / 8.0 * 2.0).abs() < 1e-4);
        assert_eq!(pushed_distance(8.0), 0.0);
        assert_eq!(pushed_distance(12.0), 0.0);
    }

    #[test]
    fn pointer_weight_scales_repulsion() {
        let mut field = ParticleField::from_parts(
            vec![Vec3::new(4.0, -0.3, 0.0)],
            vec![Vec3::ZERO],
            vec![[1.0; 3]],
            Some(vec![0.5]),
            Theme::Light,
        )
        .unwrap();
        advance(&mut field, 0.0, PointerState::CENTER, KernelParams::default());
        let pushed = field.display_positions()[0].x - 4.0;
        assert!((pushed - 0.5 * 0.5 * 2.0).abs() < 1e-4);
    }

    #[test]
    fn pointer_on_candidate_does_not_blow_up() {
        let mut field = single(Vec3::new(0.0, -0.3, 0.0));
        advance(&mut field, 0.0, PointerState::CENTER, KernelParams::default());
        let p = field.display_positions()[0];
        assert!(p.is_finite());
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn drift_grows_linearly_with_time() {
        let mut field = ParticleField::from_parts(
            vec![Vec3::ZERO],
            vec![Vec3::new(0.01, 0.0, 0.0)],
            vec![[1.0; 3]],
            None,
            Theme::Light,
        )
        .unwrap();
        let t = 1000.0;
        advance(&mut field, t, PointerState::CENTER, still());
        let expected = float_offset(t, 0) + Vec3::new(10.0, 0.0, 0.0);
        assert!((field.display_positions()[0] - expected).length() < 1e-3);
    }

    #[test]
    fn pointer_is_clamped_and_mapped() {
        let p = PointerState::new(1.5, -0.2);
        assert_eq!(p, PointerState { x: 1.0, y: 0.0 });
        assert_eq!(p.world(), Vec3::new(10.0, -10.0, 0.0));
        assert_eq!(PointerState::new(f32::NAN, 0.5), PointerState::CENTER);
    }
}
