//! Error types shared by the math layer and the shader pipeline.

use thiserror::Error;

/// Failures raised by [`Vector3`](crate::Vector3) and [`Matrix4`](crate::Matrix4) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// The matrix determinant is too close to zero to invert.
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
    /// A zero-length vector was normalized, or two basis vectors were parallel.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
}

/// A [`SceneConfig`](crate::SceneConfig) value that cannot produce a usable frame.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far, got near {near} and far {far}")]
    ClipPlanes { near: f32, far: f32 },
    #[error("sphere size must be positive, got {0}")]
    SphereSize(f32),
    #[error("{0} must be finite")]
    NotFinite(&'static str),
}

/// A WGSL module that failed to parse, validate, or link into the pipeline.
///
/// The message carries the compiler diagnostic verbatim followed by the
/// offending source, so a failed startup shows everything needed to fix it.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to parse shader '{label}':\n{diagnostic}\n{source_text}")]
    Parse {
        label: String,
        diagnostic: String,
        source_text: String,
    },
    #[error("failed to validate shader '{label}':\n{diagnostic}\n{source_text}")]
    Validation {
        label: String,
        diagnostic: String,
        source_text: String,
    },
    /// The module is valid WGSL but does not fit the impostor pipeline, or the
    /// device rejected the pipeline built from it.
    #[error("failed to link shader '{label}':\n{diagnostic}\n{source_text}")]
    Link {
        label: String,
        diagnostic: String,
        source_text: String,
    },
}
