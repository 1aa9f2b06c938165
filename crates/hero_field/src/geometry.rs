//! Decorative floating shapes layered over the particle field.
//!
//! Same sine/cosine float pattern as the particles, with per-shape phase and
//! amplitude, and a pointer *attraction* measured in the XY plane only.

use crate::{kernel::falloff, kernel::PointerState, theme::Theme};
use glam::{Vec2, Vec3};

pub const ATTRACTION_RADIUS: f32 = 6.0;
pub const ATTRACTION_STRENGTH: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Sphere,
    Torus,
    Octahedron,
    Tetrahedron,
    Icosahedron,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingShape {
    pub kind: ShapeKind,
    pub base: Vec3,
    pub phase: f32,
    pub amplitude: f32,
    /// Radians per second around (x, y).
    pub spin: Vec2,
    pub scale: f32,
    pub color: [f32; 3],
    /// Current position, written by [`FloatingGeometry::advance`].
    pub position: Vec3,
    /// Accumulated Euler rotation (x, y).
    pub rotation: Vec2,
}

impl FloatingShape {
    fn new(
        kind: ShapeKind,
        base: Vec3,
        phase: f32,
        amplitude: f32,
        spin: Vec2,
        scale: f32,
    ) -> Self {
        Self {
            kind,
            base,
            phase,
            amplitude,
            spin,
            scale,
            color: [1.0; 3],
            position: base,
            rotation: Vec2::ZERO,
        }
    }

    pub fn float_offset(&self, t: f32) -> Vec3 {
        let a = self.amplitude;
        Vec3::new(
            (t * 0.5 + self.phase).sin() * a,
            (t * 0.3 + self.phase).cos() * a * 0.6,
            (t * 0.4 + self.phase).sin() * a * 0.8,
        )
    }
}

#[derive(Debug, Clone)]
pub struct FloatingGeometry {
    shapes: Vec<FloatingShape>,
}

impl FloatingGeometry {
    pub fn new(theme: Theme) -> Self {
        let mut shapes = vec![
            FloatingShape::new(
                ShapeKind::Box,
                Vec3::new(-8.0, 4.0, -5.0),
                0.0,
                1.0,
                Vec2::new(0.3, 0.5),
                1.2,
            ),
            FloatingShape::new(
                ShapeKind::Sphere,
                Vec3::new(7.0, -3.0, -4.0),
                1.1,
                0.8,
                Vec2::new(0.2, 0.2),
                1.0,
            ),
            FloatingShape::new(
                ShapeKind::Torus,
                Vec3::new(-5.0, -5.0, -8.0),
                2.3,
                1.2,
                Vec2::new(0.4, 0.25),
                1.4,
            ),
            FloatingShape::new(
                ShapeKind::Octahedron,
                Vec3::new(6.0, 5.0, -6.0),
                3.7,
                0.9,
                Vec2::new(0.15, 0.45),
                1.1,
            ),
            FloatingShape::new(
                ShapeKind::Tetrahedron,
                Vec3::new(0.0, 7.0, -10.0),
                4.4,
                1.1,
                Vec2::new(0.5, 0.3),
                0.9,
            ),
            FloatingShape::new(
                ShapeKind::Icosahedron,
                Vec3::new(2.0, -7.0, -7.0),
                5.2,
                0.7,
                Vec2::new(0.25, 0.35),
                1.3,
            ),
        ];
        let palette = theme.palette();
        for (i, shape) in shapes.iter_mut().enumerate() {
            shape.color = palette[i % palette.len()];
        }
        Self { shapes }
    }

    pub fn shapes(&self) -> &[FloatingShape] {
        &self.shapes
    }

    /// Moves every shape for elapsed time `t`, spinning by `dt` seconds.
    pub fn advance(&mut self, t: f32, dt: f32, pointer: PointerState) {
        let target = pointer.world_xy();
        for shape in &mut self.shapes {
            let mut position = shape.base + shape.float_offset(t);

            let toward = target - position.truncate();
            let d = toward.length();
            if d > 0.0 && d < ATTRACTION_RADIUS {
                let pull = (toward / d) * falloff(d, ATTRACTION_RADIUS) * ATTRACTION_STRENGTH;
                position += pull.extend(0.0);
            }

            shape.position = position;
            shape.rotation += shape.spin * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_shapes_coloured_from_palette() {
        let geometry = FloatingGeometry::new(Theme::Minimal);
        assert_eq!(geometry.shapes().len(), 6);
        for shape in geometry.shapes() {
            assert!(Theme::Minimal.palette().contains(&shape.color));
        }
    }

    #[test]
    fn attraction_pulls_in_xy_only() {
        let mut geometry = FloatingGeometry::new(Theme::Light);
        let t = 2.0;
        let shape = geometry.shapes()[0];
        let free = shape.base + shape.float_offset(t);

        // Pointer 3 units to the right of the shape, same height.
        let pointer = PointerState::new((free.x + 3.0) / 20.0 + 0.5, free.y / 20.0 + 0.5);
        geometry.advance(t, 0.0, pointer);

        let moved = geometry.shapes()[0].position;
        assert!(moved.x > free.x);
        assert!((moved.x - free.x - 0.5 * ATTRACTION_STRENGTH).abs() < 1e-3);
        assert!((moved.y - free.y).abs() < 1e-3);
        assert_eq!(moved.z, free.z);
    }

    #[test]
    fn far_pointer_leaves_float_pattern_untouched() {
        let mut geometry = FloatingGeometry::new(Theme::Dark);
        let pointer = PointerState::new(1.0, 1.0);
        geometry.advance(0.0, 0.5, pointer);
        let shape = geometry.shapes()[2];
        assert_eq!(shape.position, shape.base + shape.float_offset(0.0));
        assert_eq!(shape.rotation, shape.spin * 0.5);
    }
}
