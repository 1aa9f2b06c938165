//! Particle field simulation for the portfolio hero scene.
//!
//! The crate holds everything that runs once per frame behind the hero: a
//! one-shot device capability probe, a frame-rate driven quality governor, the
//! particle field generator and its allocation-free update kernel, the
//! floating-geometry layer with camera follow, and the shell that decides
//! whether a 3D scene can be shown at all. Nothing here touches a GPU; hosts
//! read the position and colour buffers and submit them to their renderer.

pub mod backdrop;
pub mod camera;
pub mod config;
pub mod device;
pub mod error;
pub mod field;
pub mod geometry;
pub mod kernel;
pub mod quality;
pub mod scene;
pub mod shell;
pub mod theme;

pub use backdrop::{BackdropShape, StaticBackdrop};
pub use camera::CameraFollow;
pub use config::HeroConfig;
pub use device::{
    probe, CapabilitySource, DeviceClass, DeviceProfile, FieldVariant, PerformanceTier,
    RenderCapabilities, ShadowQuality,
};
pub use error::{ConfigError, ProbeError};
pub use field::ParticleField;
pub use geometry::{FloatingGeometry, FloatingShape, ShapeKind};
pub use kernel::{advance, KernelParams, PointerState};
pub use quality::{QualityBucket, QualityGovernor};
pub use scene::{FrameTick, HeroScene};
pub use shell::{ContextEvent, FrameOutput, HeroShell, HostPage, ListenerKind, ShellState};
pub use theme::{Rgb, Theme};
