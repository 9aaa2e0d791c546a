use core::ops::{Mul, Neg, Sub};

use crate::error::MathError;

/// Magnitudes at or below this are treated as zero by the normalizers.
pub const NORM_EPSILON: f32 = 1e-12;

/// A 3-component vector in world or object space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);
    pub const NEG_Z: Self = Self::new(0.0, 0.0, -1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// `a - b`.
    #[inline]
    pub fn sub(a: Self, b: Self) -> Self {
        Self::new(a.x - b.x, a.y - b.y, a.z - b.z)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or the zero vector when `self` has no length.
    ///
    /// Never produces NaN.
    pub fn norm(self) -> Self {
        self.try_norm().unwrap_or(Self::ZERO)
    }

    /// Unit vector in the same direction.
    ///
    /// Returns [`MathError::DegenerateVector`] when the magnitude is (near) zero.
    pub fn try_norm(self) -> Result<Self, MathError> {
        let len = self.length();
        if len <= NORM_EPSILON || !len.is_finite() {
            return Err(MathError::DegenerateVector);
        }
        Ok(self * (1.0 / len))
    }

    /// Unit vector in the same direction, or `fallback` when `self` has no length.
    pub fn norm_or(self, fallback: Self) -> Self {
        self.try_norm().unwrap_or(fallback)
    }

}

impl Sub for Vector3 {
    type Output = Vector3;
    #[inline]
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::sub(self, rhs)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: f32) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    #[inline]
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}
