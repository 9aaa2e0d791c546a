//! # Impostor
//!
//! **A sphere drawn from a single quad.**
//!
//! Instead of tessellating a sphere, the renderer rasterizes one camera-facing
//! quad and lets the fragment shader reconstruct the sphere surface per pixel,
//! discarding everything outside the silhouette. The camera slides across a
//! plane in front of the sphere following the pointer.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     impostor::init_logging(impostor::LoggingConfig::default());
//!     impostor::run()
//! }
//! ```
//!
//! ## Layers
//!
//! - [`Vector3`] and [`Matrix4`]: row-vector linear algebra whose matrices
//!   upload to WGSL unchanged.
//! - [`OrbitCamera`], [`Camera`] and [`derive_frame`]: the per-frame model,
//!   view and projection products.
//! - [`impostor`]: the billboard and shading math, mirrored by
//!   `shaders/impostor.wgsl`.
//! - [`GraphicsContext`] and [`RenderState`]: GPU resources and the mutable
//!   per-window state driven by the winit loop in [`run`].

mod app;
mod camera;
mod error;
mod gpu;
mod graphics;
pub mod impostor;
mod impostor_pass;
mod input;
mod logging;
mod matrix;
mod orbit_camera;
mod render_state;
mod scene;
mod shader;
mod vector;

pub use app::{AppConfig, SceneConfig, run, run_with_config};
pub use camera::Camera;
pub use error::{ConfigError, MathError, ShaderError};
pub use gpu::{GpuContext, SurfaceErrorAction};
pub use graphics::{FrameOutcome, GraphicsContext};
pub use impostor::ImpostorUniforms;
pub use impostor_pass::ImpostorPass;
pub use input::Input;
pub use logging::{LoggingConfig, init_logging};
pub use matrix::{ClipDepth, Matrix4};
pub use orbit_camera::OrbitCamera;
pub use render_state::{FrameRequest, FrameScheduler, RenderState, Viewport};
pub use scene::{FrameMatrices, SphereImpostor, derive_frame};
pub use shader::{IMPOSTOR_WGSL, validate_impostor_wgsl, validate_wgsl};
pub use vector::Vector3;

// Re-export the glam pointer type for convenience
pub use glam::Vec2;
