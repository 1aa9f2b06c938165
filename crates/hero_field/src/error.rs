//! Error types for the hero core.
//!
//! Neither error ever reaches the per-frame path: probe failures are folded
//! into the `Unsupported` shell state and configuration errors only surface
//! from the strict parsing helpers used by the binaries.

use thiserror::Error;

/// Failure to obtain a rendering context while probing capabilities.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no rendering adapter is available")]
    NoAdapter,
    #[error("rendering context could not be created: {0}")]
    ContextCreation(String),
}

/// Invalid user-supplied configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown theme '{0}' (expected one of: light, dark, neon, minimal)")]
    UnknownTheme(String),
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
}
