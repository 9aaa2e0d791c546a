use crate::error::MathError;
use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// A perspective camera described by an eye point, a target and an up hint.
///
/// Produced each frame by [`OrbitCamera`](crate::OrbitCamera) from the pointer
/// position. Holds no GPU state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::ZERO,
            up: Vector3::Y,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, eye: Vector3) -> Self {
        self.eye = eye;
        self
    }

    /// Camera-to-world transform.
    pub fn matrix(&self) -> Result<Matrix4, MathError> {
        Matrix4::look_at(self.eye, self.target, self.up)
    }

    /// World-to-camera transform, the inverse of [`matrix`](Self::matrix).
    pub fn view_matrix(&self) -> Result<Matrix4, MathError> {
        self.matrix()?.inverse()
    }

    /// Perspective projection for a viewport of the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Matrix4 {
        Matrix4::perspective(aspect, self.fov_y_degrees, self.near, self.far)
    }
}
