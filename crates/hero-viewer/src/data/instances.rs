//! Field and shape state converted into sprite instances.

use super::types::SpriteAttrib;
use glam::Vec3;
use hero_field::{FloatingGeometry, ParticleField, Rgb};

/// World-space half-extent of a floating shape sprite per unit of scale.
const SHAPE_SPRITE_SIZE: f32 = 0.9;

/// Palette colours are authored in sRGB; the surface expects linear values.
pub fn srgb_to_linear(c: Rgb) -> [f32; 3] {
    c.map(|v| {
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    })
}

pub fn field_attribs(
    field: &ParticleField,
) -> impl ExactSizeIterator<Item = SpriteAttrib> + '_ {
    let size = field.point_size();
    field.colors().iter().map(move |&c| SpriteAttrib {
        color: srgb_to_linear(c),
        size,
    })
}

pub fn shape_positions(geometry: &FloatingGeometry, out: &mut Vec<Vec3>) {
    out.clear();
    out.extend(geometry.shapes().iter().map(|s| s.position));
}

pub fn shape_attribs(
    geometry: &FloatingGeometry,
) -> impl ExactSizeIterator<Item = SpriteAttrib> + '_ {
    geometry.shapes().iter().map(|s| SpriteAttrib {
        color: srgb_to_linear(s.color),
        size: s.scale * SHAPE_SPRITE_SIZE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_field::{FieldVariant, Theme};

    #[test]
    fn srgb_endpoints_are_fixed() {
        let c = srgb_to_linear([0.0, 1.0, 0.0]);
        assert_eq!(c[0], 0.0);
        assert!((c[1] - 1.0).abs() < 1e-5);
        let mid = srgb_to_linear([0.5, 0.5, 0.5])[0];
        assert!((mid - 0.214).abs() < 1e-3);
    }

    #[test]
    fn field_attribs_follow_variant_point_size() {
        let field = ParticleField::from_parts(
            vec![Vec3::X, Vec3::Y],
            vec![Vec3::ZERO, Vec3::ZERO],
            vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            Some(vec![1.0, 1.0]),
            Theme::Dark,
        )
        .unwrap();
        let attribs: Vec<_> = field_attribs(&field).collect();
        assert_eq!(attribs.len(), 2);
        assert!(attribs
            .iter()
            .all(|a| a.size == FieldVariant::Standard.point_size()));
        assert!((attribs[0].color[0] - 1.0).abs() < 1e-5);
        assert_eq!(attribs[0].color[2], 0.0);
    }

    #[test]
    fn one_sprite_per_shape() {
        let geometry = FloatingGeometry::new(Theme::Neon);
        let mut positions = vec![Vec3::splat(9.0); 32];
        shape_positions(&geometry, &mut positions);
        assert_eq!(positions.len(), geometry.shapes().len());
        assert_eq!(shape_attribs(&geometry).len(), positions.len());
    }
}
