//! Builds the per-layer uniforms from the scene's follow camera.

use crate::data::types::SpriteUniformStd140 as SpriteUniform;
use glam::Mat4;
use hero_field::{CameraFollow, HeroScene};

/// Opacity of field particles.
pub const FIELD_OPACITY: f32 = 0.8;
/// Opacity of the floating shapes behind and around the field.
pub const SHAPE_OPACITY: f32 = 0.35;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub view: Mat4,
    pub proj: Mat4,
}

impl Camera {
    /// Camera for the current follow state and a viewport of `width` x `height`.
    pub fn from_follow(follow: &CameraFollow, width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Self {
            view: follow.view(),
            proj: CameraFollow::projection(aspect),
        }
    }

    pub fn uniform(&self, model: Mat4, opacity: f32) -> SpriteUniform {
        SpriteUniform {
            view: self.view.to_cols_array_2d(),
            proj: self.proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            opacity,
            _pad: [0.0; 3],
        }
    }

    /// Uniforms for the field layer (rotated) and the shape layer (unrotated).
    pub fn scene_uniforms(
        scene: &HeroScene,
        width: u32,
        height: u32,
    ) -> (SpriteUniform, SpriteUniform) {
        let camera = Self::from_follow(scene.camera(), width, height);
        (
            camera.uniform(scene.model_matrix(), FIELD_OPACITY),
            camera.uniform(Mat4::IDENTITY, SHAPE_OPACITY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn origin_sits_in_front_of_the_camera() {
        let camera = Camera::from_follow(&CameraFollow::default(), 1280, 720);
        let clip = camera.proj * camera.view * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn zero_height_viewport_does_not_produce_nan() {
        let camera = Camera::from_follow(&CameraFollow::default(), 800, 0);
        assert!(camera.proj.is_finite());
    }

    #[test]
    fn uniform_carries_opacity_and_model() {
        let camera = Camera::from_follow(&CameraFollow::default(), 100, 100);
        let model = Mat4::from_rotation_y(0.3);
        let u = camera.uniform(model, 0.5);
        assert_eq!(u.opacity, 0.5);
        assert_eq!(u.model, model.to_cols_array_2d());
    }
}
