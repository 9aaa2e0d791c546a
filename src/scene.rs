//! Per-frame matrix derivation for the sphere impostor.
//!
//! Everything here is recomputed from scratch each frame; nothing is mutated in
//! place and no state survives between frames except what the caller keeps.

use crate::camera::Camera;
use crate::error::MathError;
use crate::impostor::ImpostorUniforms;
use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// The single implicit sphere drawn by the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereImpostor {
    /// World-space centre.
    pub position: Vector3,
    /// Radius, also the half-extent of the billboard quad.
    pub size: f32,
}

impl Default for SphereImpostor {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            size: 1.0,
        }
    }
}

impl SphereImpostor {
    /// Direction from the eye to the sphere, falling back to `-Z` when the eye
    /// sits exactly on the sphere centre.
    pub fn facing_direction(&self, eye: Vector3) -> Vector3 {
        Vector3::sub(self.position, eye).norm_or(Vector3::NEG_Z)
    }

    /// Rotation turning the quad's front (`+Z`) toward `eye`.
    ///
    /// When the eye sits straight above or below the sphere along `up`, the
    /// rotation is built around `+Z` instead, then `+X`; only the quad's roll
    /// around the view axis changes.
    pub fn facing_rotation(&self, eye: Vector3, up: Vector3) -> Result<Matrix4, MathError> {
        let direction = self.facing_direction(eye);
        [up, Vector3::Z, Vector3::X]
            .into_iter()
            .find_map(|hint| Matrix4::look_to(direction, hint).ok())
            .ok_or(MathError::DegenerateVector)
    }
}

/// All matrices derived for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMatrices {
    pub model: Matrix4,
    pub view: Matrix4,
    pub projection: Matrix4,
    /// `view · projection`.
    pub view_projection: Matrix4,
    /// `model · view · projection`.
    pub model_view_projection: Matrix4,
    pub size: f32,
}

impl FrameMatrices {
    /// The uniform block uploaded for this frame.
    pub fn uniforms(&self) -> ImpostorUniforms {
        ImpostorUniforms::new(
            &self.model,
            &self.view_projection,
            &self.model_view_projection,
            self.size,
        )
    }
}

/// Derives the frame's model, view and projection products.
///
/// The model rotation turns the sphere's local `+Z` toward the eye, so the quad
/// in the local XY plane always faces the camera and the fragment stage can
/// treat it as the visible hemisphere.
pub fn derive_frame(
    camera: &Camera,
    sphere: &SphereImpostor,
    projection: &Matrix4,
) -> Result<FrameMatrices, MathError> {
    let view = camera.view_matrix()?;

    let translation = Matrix4::translate(sphere.position.x, sphere.position.y, sphere.position.z);
    let rotation = sphere.facing_rotation(camera.eye, camera.up)?;

    let model = rotation * translation;
    let view_projection = view * *projection;
    let model_view_projection = model * view_projection;

    Ok(FrameMatrices {
        model,
        view,
        projection: *projection,
        view_projection,
        model_view_projection,
        size: sphere.size,
    })
}
