// src/data/mod.rs
//! CPU-side preparation of the scene for the GPU.
//!
//! - GPU buffer layouts shared with the sprite shader.
//! - Conversion of field and shape state into those layouts.

pub mod instances;
pub mod types;

pub use self::types::{SpriteAttrib, SpriteUniformStd140};
