use glam::Vec2;

use crate::camera::Camera;
use crate::vector::Vector3;

/// A camera controller that slides the eye over a plane in front of the target.
///
/// The normalized pointer position `(u, v)` in `[0, 1]²` maps to an eye at
/// `(r·(2u − 1), r·(2v − 1), depth)`, so the centre of the window looks straight
/// down `-Z` and the corners sit `radius` units off-axis.
///
/// # Example
/// ```
/// use impostor::{OrbitCamera, Vec2};
///
/// let orbit = OrbitCamera::new().radius(10.0).depth(5.0);
/// let camera = orbit.camera(Vec2::new(0.5, 0.5));
/// assert_eq!(camera.eye.z, 5.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera looks at.
    pub target: Vector3,
    /// Largest eye offset along X and Y.
    pub radius: f32,
    /// Fixed eye Z coordinate.
    pub depth: f32,
    /// Up hint for the look-at basis.
    pub up: Vector3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vector3::ZERO,
            radius: 10.0,
            depth: 5.0,
            up: Vector3::Y,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target point.
    pub fn target(mut self, target: Vector3) -> Self {
        self.target = target;
        self
    }

    /// Set the largest X/Y eye offset.
    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the fixed eye Z coordinate.
    pub fn depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the field of view in degrees.
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov_y_degrees = fov_degrees;
        self
    }

    /// Set the near and far clip distances.
    pub fn clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Eye position for a normalized pointer coordinate.
    pub fn eye(&self, pointer: Vec2) -> Vector3 {
        Vector3::new(
            self.radius * (2.0 * pointer.x - 1.0),
            self.radius * (2.0 * pointer.y - 1.0),
            self.depth,
        )
    }

    /// Camera state for a normalized pointer coordinate.
    pub fn camera(&self, pointer: Vec2) -> Camera {
        Camera {
            eye: self.eye(pointer),
            target: self.target,
            up: self.up,
            fov_y_degrees: self.fov_y_degrees,
            near: self.near,
            far: self.far,
        }
    }
}
