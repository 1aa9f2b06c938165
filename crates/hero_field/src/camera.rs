use crate::kernel::PointerState;
use glam::{Mat4, Vec3};

/// Where the camera sits when the pointer is centred.
pub const CAMERA_BASE: Vec3 = Vec3::new(0.0, 0.0, 15.0);
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Pointer-driven camera sway, exponentially smoothed.
///
/// The camera is re-aimed at the origin every frame, so orientation is a pure
/// function of the current offset and never accumulates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFollow {
    pub target_offset: Vec3,
    pub current_offset: Vec3,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            target_offset: Vec3::ZERO,
            current_offset: Vec3::ZERO,
        }
    }
}

impl CameraFollow {
    pub fn advance(&mut self, pointer: PointerState, dt: f32) {
        self.target_offset = Vec3::new((pointer.x - 0.5) * 2.0, pointer.y - 0.5, 0.0);
        if !(dt > 0.0) {
            return;
        }
        let k = (dt * 2.0).min(1.0);
        self.current_offset = self.current_offset.lerp(self.target_offset, k);
    }

    pub fn eye(&self) -> Vec3 {
        CAMERA_BASE + self.current_offset
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            CAMERA_FOV_DEG.to_radians(),
            aspect.max(1e-3),
            CAMERA_NEAR,
            CAMERA_FAR,
        )
    }
}
