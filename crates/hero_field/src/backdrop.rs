//! Static substitute shown when no 3D context is available.
//!
//! Shapes carry keyframe parameters only; a host paints them the way a CSS
//! animation would, with no per-frame simulation state.

use crate::theme::{Rgb, Theme};
use serde::Serialize;

const SHAPE_COUNT: u32 = 16;
/// Peak vertical travel of the float keyframe, in logical pixels.
const FLOAT_TRAVEL_PX: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackdropShape {
    /// Horizontal position, percent of the viewport width.
    pub left_pct: f32,
    /// Vertical position, percent of the viewport height.
    pub top_pct: f32,
    pub size_px: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub delay_s: f32,
    pub duration_s: f32,
}

impl BackdropShape {
    /// Vertical keyframe offset at time `t`: 0 → -20px → 0, ease-in-out.
    pub fn offset_y(&self, t: f32) -> f32 {
        let local = t - self.delay_s;
        if local <= 0.0 || self.duration_s <= 0.0 {
            return 0.0;
        }
        let phase = (local / self.duration_s).fract();
        // Triangle 0 → 1 → 0 over the cycle, then smoothstep for easing.
        let tri = 1.0 - (2.0 * phase - 1.0).abs();
        let eased = tri * tri * (3.0 - 2.0 * tri);
        -FLOAT_TRAVEL_PX * eased
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticBackdrop {
    pub background: Rgb,
    pub shapes: Vec<BackdropShape>,
}

impl StaticBackdrop {
    /// Deterministic layout per theme.
    pub fn for_theme(theme: Theme) -> Self {
        let palette = theme.palette();
        let shapes = (0..SHAPE_COUNT)
            .map(|i| {
                let h = |salt: u32| hash01(i.wrapping_mul(2_654_435_761) ^ salt);
                BackdropShape {
                    left_pct: 5.0 + h(0x9e37) * 90.0,
                    top_pct: 5.0 + h(0x7f4a) * 90.0,
                    size_px: 4.0 + h(0x51ed) * 12.0,
                    color: palette[i as usize % palette.len()],
                    opacity: 0.3 + h(0x2c1b) * 0.5,
                    delay_s: h(0x68e3) * 4.0,
                    duration_s: 3.0 + h(0x1b87) * 3.0,
                }
            })
            .collect();

        Self {
            background: theme.background(),
            shapes,
        }
    }
}

fn hash01(seed: u32) -> f32 {
    let mut x = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    x ^= x >> 16;
    x = x.wrapping_mul(2_246_822_519);
    x ^= x >> 13;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_deterministic_and_in_bounds() {
        let a = StaticBackdrop::for_theme(Theme::Dark);
        let b = StaticBackdrop::for_theme(Theme::Dark);
        assert_eq!(a, b);
        assert_eq!(a.shapes.len(), SHAPE_COUNT as usize);
        for s in &a.shapes {
            assert!((5.0..=95.0).contains(&s.left_pct));
            assert!((5.0..=95.0).contains(&s.top_pct));
            assert!(Theme::Dark.palette().contains(&s.color));
        }
    }

    #[test]
    fn keyframe_peaks_mid_cycle() {
        let shape = BackdropShape {
            left_pct: 50.0,
            top_pct: 50.0,
            size_px: 8.0,
            color: [1.0; 3],
            opacity: 1.0,
            delay_s: 1.0,
            duration_s: 4.0,
        };
        assert_eq!(shape.offset_y(0.5), 0.0);
        assert!((shape.offset_y(3.0) + FLOAT_TRAVEL_PX).abs() < 1e-4);
        assert!(shape.offset_y(2.0) > shape.offset_y(3.0));
        assert!(shape.offset_y(5.0).abs() < 1e-4);
    }
}
