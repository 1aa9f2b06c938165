//! GPU data layouts for the sprite pipeline.

/// Per-instance static attributes, re-uploaded only when the field regenerates.
/// Must match the instance inputs at locations 2 and 3 in the sprite shader.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct SpriteAttrib {
    /// Linear RGB.
    pub color: [f32; 3],
    /// Sprite half-extent in world units.
    pub size: f32,
}

/// Per-layer uniform block, std140.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteUniformStd140 {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub opacity: f32,
    pub _pad: [f32; 3],
}

const _: [(); 208] = [(); core::mem::size_of::<SpriteUniformStd140>()];
const _: [(); 16] = [(); core::mem::size_of::<SpriteAttrib>()];
