//! 4x4 homogeneous transforms.
//!
//! [`Matrix4`] uses the row-vector convention: a point is transformed as
//! `v' = v · M`, so `a * b` applies `a` first and then `b`. Composition therefore
//! reads left to right (model, then view, then projection).
//!
//! Elements are stored row by row. Under the row-vector convention that is the
//! same sequence of floats a column-major `mat4x4<f32>` in WGSL holds for the
//! equivalent column-vector transform, so [`Matrix4::elements`] can be uploaded
//! as-is and used as `matrix * vec4f(..)` on the GPU. Translation lives in
//! elements 12, 13 and 14.

use core::ops::Mul;

use crate::error::MathError;
use crate::vector::Vector3;

/// Determinants with a magnitude below this are treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-8;

/// Depth range a perspective projection maps the view frustum into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ClipDepth {
    /// `near -> 0`, `far -> 1`. Native to wgpu, Vulkan, Metal and D3D.
    #[default]
    ZeroToOne,
    /// `near -> -1`, `far -> 1`. The OpenGL / WebGL convention.
    NegativeOneToOne,
}

/// A 4x4 transform in row-vector convention.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4 {
    elements: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const fn from_elements(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// The flat element sequence, ready for a uniform upload.
    pub const fn elements(&self) -> [f32; 16] {
        self.elements
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.elements[row * 4 + col]
    }

    /// A pure translation.
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::from_elements([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        ])
    }

    /// Symmetric right-handed perspective projection into wgpu's `[0, 1]` depth range.
    ///
    /// `fov_y_degrees` is the full vertical field of view in degrees.
    pub fn perspective(aspect: f32, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        Self::perspective_with_depth(aspect, fov_y_degrees, near, far, ClipDepth::ZeroToOne)
    }

    /// Symmetric right-handed perspective projection into the given depth range.
    ///
    /// View space looks down `-Z`; a point at depth `-near` lands on the near end
    /// of `depth`, a point at `-far` on the far end.
    pub fn perspective_with_depth(
        aspect: f32,
        fov_y_degrees: f32,
        near: f32,
        far: f32,
        depth: ClipDepth,
    ) -> Self {
        debug_assert!(aspect > 0.0, "aspect must be positive");
        debug_assert!(
            fov_y_degrees > 0.0 && fov_y_degrees < 180.0,
            "fov must be in (0, 180) degrees"
        );
        debug_assert!(near > 0.0 && near < far, "expected 0 < near < far");

        let f = 1.0 / (fov_y_degrees.to_radians() * 0.5).tan();
        let range = 1.0 / (near - far);

        let (zz, wz) = match depth {
            ClipDepth::ZeroToOne => (far * range, near * far * range),
            ClipDepth::NegativeOneToOne => ((near + far) * range, 2.0 * near * far * range),
        };

        Self::from_elements([
            f / aspect, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, zz, -1.0, //
            0.0, 0.0, wz, 0.0,
        ])
    }

    /// Camera-to-world transform placed at `eye` and looking at `target`.
    ///
    /// The camera looks down its local `-Z`; the rows of the rotation part are the
    /// right, up and backward axes. Fails with [`MathError::DegenerateVector`] when
    /// `eye == target` or `up` is parallel to the viewing direction.
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Result<Self, MathError> {
        let (x, y, z) = basis(Vector3::sub(eye, target), up)?;
        Ok(Self::from_rows(x, y, z, eye))
    }

    /// Rotation whose forward axis (`-Z`) points along `direction`.
    ///
    /// Same basis as [`look_at`](Self::look_at) without the translation, used to
    /// turn an object to face along a direction regardless of where it sits.
    pub fn look_to(direction: Vector3, up: Vector3) -> Result<Self, MathError> {
        let (x, y, z) = basis(-direction, up)?;
        Ok(Self::from_rows(x, y, z, Vector3::ZERO))
    }

    fn from_rows(x: Vector3, y: Vector3, z: Vector3, w: Vector3) -> Self {
        Self::from_elements([
            x.x, x.y, x.z, 0.0, //
            y.x, y.y, y.z, 0.0, //
            z.x, z.y, z.z, 0.0, //
            w.x, w.y, w.z, 1.0,
        ])
    }

    /// Matrix product: the result applies `a` first, then `b`.
    pub fn mul(a: &Self, b: &Self) -> Self {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = (0..4).map(|k| a.get(row, k) * b.get(k, col)).sum();
            }
        }
        Self::from_elements(out)
    }

    pub fn determinant(&self) -> f32 {
        Cofactors::of(self).det
    }

    /// General inverse.
    ///
    /// Fails with [`MathError::SingularMatrix`] when the determinant is (near) zero.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let c = Cofactors::of(self);
        if !c.det.is_finite() || c.det.abs() < SINGULAR_EPSILON {
            return Err(MathError::SingularMatrix);
        }
        let inv = 1.0 / c.det;
        let [
            a00, a01, a02, a03, //
            a10, a11, a12, a13, //
            a20, a21, a22, a23, //
            a30, a31, a32, a33,
        ] = self.elements;
        let Cofactors {
            b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11, ..
        } = c;

        Ok(Self::from_elements([
            (a11 * b11 - a12 * b10 + a13 * b09) * inv,
            (a02 * b10 - a01 * b11 - a03 * b09) * inv,
            (a31 * b05 - a32 * b04 + a33 * b03) * inv,
            (a22 * b04 - a21 * b05 - a23 * b03) * inv,
            (a12 * b08 - a10 * b11 - a13 * b07) * inv,
            (a00 * b11 - a02 * b08 + a03 * b07) * inv,
            (a32 * b02 - a30 * b05 - a33 * b01) * inv,
            (a20 * b05 - a22 * b02 + a23 * b01) * inv,
            (a10 * b10 - a11 * b08 + a13 * b06) * inv,
            (a01 * b08 - a00 * b10 - a03 * b06) * inv,
            (a30 * b04 - a31 * b02 + a33 * b00) * inv,
            (a21 * b02 - a20 * b04 - a23 * b00) * inv,
            (a11 * b07 - a10 * b09 - a12 * b06) * inv,
            (a00 * b09 - a01 * b07 + a02 * b06) * inv,
            (a31 * b01 - a30 * b03 - a32 * b00) * inv,
            (a20 * b03 - a21 * b01 + a22 * b00) * inv,
        ]))
    }

    /// Transforms a homogeneous row vector: `v · self`.
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        for (col, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|row| v[row] * self.get(row, col)).sum();
        }
        out
    }

    /// Transforms a point (`w = 1`) and returns the non-divided `xyz`.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let [x, y, z, _] = self.transform([p.x, p.y, p.z, 1.0]);
        Vector3::new(x, y, z)
    }

    /// Transforms a direction (`w = 0`), ignoring translation.
    pub fn transform_direction(&self, d: Vector3) -> Vector3 {
        let [x, y, z, _] = self.transform([d.x, d.y, d.z, 0.0]);
        Vector3::new(x, y, z)
    }

    /// Translation part (elements 12, 13, 14).
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.elements[12], self.elements[13], self.elements[14])
    }

    /// The equivalent column-vector `glam` matrix.
    pub fn to_glam(&self) -> glam::Mat4 {
        glam::Mat4::from_cols_array(&self.elements)
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        Matrix4::mul(&self, &rhs)
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        Self::from_elements(m.to_cols_array())
    }
}

/// Orthonormal right/up/back axes from a backward vector and an up hint.
fn basis(back: Vector3, up: Vector3) -> Result<(Vector3, Vector3, Vector3), MathError> {
    let z = back.try_norm()?;
    let x = up.cross(z).try_norm()?;
    let y = z.cross(x);
    Ok((x, y, z))
}

/// 2x2 sub-determinants shared by `determinant` and `inverse`.
struct Cofactors {
    b00: f32,
    b01: f32,
    b02: f32,
    b03: f32,
    b04: f32,
    b05: f32,
    b06: f32,
    b07: f32,
    b08: f32,
    b09: f32,
    b10: f32,
    b11: f32,
    det: f32,
}

impl Cofactors {
    fn of(m: &Matrix4) -> Self {
        let [
            a00, a01, a02, a03, //
            a10, a11, a12, a13, //
            a20, a21, a22, a23, //
            a30, a31, a32, a33,
        ] = m.elements;

        let b00 = a00 * a11 - a01 * a10;
        let b01 = a00 * a12 - a02 * a10;
        let b02 = a00 * a13 - a03 * a10;
        let b03 = a01 * a12 - a02 * a11;
        let b04 = a01 * a13 - a03 * a11;
        let b05 = a02 * a13 - a03 * a12;
        let b06 = a20 * a31 - a21 * a30;
        let b07 = a20 * a32 - a22 * a30;
        let b08 = a20 * a33 - a23 * a30;
        let b09 = a21 * a32 - a22 * a31;
        let b10 = a21 * a33 - a23 * a31;
        let b11 = a22 * a33 - a23 * a32;
        let det = b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06;

        Self {
            b00,
            b01,
            b02,
            b03,
            b04,
            b05,
            b06,
            b07,
            b08,
            b09,
            b10,
            b11,
            det,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_matrix_near(a: &Matrix4, b: &Matrix4) {
        for (i, (x, y)) in a.elements().iter().zip(b.elements().iter()).enumerate() {
            assert!(
                (x - y).abs() < EPS,
                "element {i} differs: {x} vs {y}\n{a:?}\n{b:?}"
            );
        }
    }

    fn ndc_depth(proj: &Matrix4, view_z: f32) -> f32 {
        let [_, _, z, w] = proj.transform([0.0, 0.0, view_z, 1.0]);
        z / w
    }

    #[test]
    fn translation_lives_in_last_row() {
        let t = Matrix4::translate(1.0, 2.0, 3.0);
        assert_eq!(&t.elements()[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(
            t.transform_point(Vector3::new(1.0, 1.0, 1.0)),
            Vector3::new(2.0, 3.0, 4.0)
        );
        assert_eq!(t.transform_direction(Vector3::X), Vector3::X);
    }

    #[test]
    fn mul_applies_left_operand_first() {
        let move_x = Matrix4::translate(1.0, 0.0, 0.0);
        let turn = Matrix4::look_to(Vector3::X, Vector3::Y).unwrap();

        // Translate first, then rotate: the offset is rotated too.
        let p = (move_x * turn).transform_point(Vector3::ZERO);
        let expected = turn.transform_point(Vector3::X);
        assert!((p - expected).length() < EPS);

        // Rotate first, then translate: the origin only moves along +X.
        let q = (turn * move_x).transform_point(Vector3::ZERO);
        assert!((q - Vector3::X).length() < EPS);
    }

    #[test]
    fn identity_is_neutral() {
        let m = Matrix4::look_at(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::ZERO,
            Vector3::Y,
        )
        .unwrap();
        assert_matrix_near(&(m * Matrix4::IDENTITY), &m);
        assert_matrix_near(&(Matrix4::IDENTITY * m), &m);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        for &(aspect, fov, near, far) in &[
            (1.0, 60.0, 0.1, 1000.0),
            (16.0 / 9.0, 45.0, 1.0, 10.0),
            (0.5, 120.0, 0.01, 50.0),
        ] {
            let p = Matrix4::perspective(aspect, fov, near, far);
            assert!(ndc_depth(&p, -near).abs() < EPS);
            assert!((ndc_depth(&p, -far) - 1.0).abs() < EPS);

            let gl = Matrix4::perspective_with_depth(
                aspect,
                fov,
                near,
                far,
                ClipDepth::NegativeOneToOne,
            );
            assert!((ndc_depth(&gl, -near) + 1.0).abs() < EPS);
            assert!((ndc_depth(&gl, -far) - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn perspective_matches_glam() {
        let ours = Matrix4::perspective(1.5, 60.0, 0.1, 1000.0);
        let theirs = glam::Mat4::perspective_rh(60f32.to_radians(), 1.5, 0.1, 1000.0);
        assert_matrix_near(&ours, &theirs.into());

        let ours_gl = Matrix4::perspective_with_depth(
            1.5,
            60.0,
            0.1,
            1000.0,
            ClipDepth::NegativeOneToOne,
        );
        let theirs_gl = glam::Mat4::perspective_rh_gl(60f32.to_radians(), 1.5, 0.1, 1000.0);
        assert_matrix_near(&ours_gl, &theirs_gl.into());
    }

    #[test]
    fn look_at_basis_is_orthonormal() {
        let m = Matrix4::look_at(
            Vector3::new(-7.0, 3.0, 5.0),
            Vector3::new(1.0, 0.0, -2.0),
            Vector3::Y,
        )
        .unwrap();
        let rows: Vec<Vector3> = (0..3)
            .map(|r| Vector3::new(m.get(r, 0), m.get(r, 1), m.get(r, 2)))
            .collect();
        for (i, a) in rows.iter().enumerate() {
            assert!((a.length() - 1.0).abs() < EPS);
            for b in rows.iter().skip(i + 1) {
                assert!(a.dot(*b).abs() < EPS);
            }
        }
        assert_eq!(m.translation(), Vector3::new(-7.0, 3.0, 5.0));
    }

    #[test]
    fn inverse_look_at_is_the_glam_view_matrix() {
        let eye = Vector3::new(4.0, -6.0, 5.0);
        let view = Matrix4::look_at(eye, Vector3::ZERO, Vector3::Y)
            .unwrap()
            .inverse()
            .unwrap();
        let expected = glam::Mat4::look_at_rh(eye.into(), glam::Vec3::ZERO, glam::Vec3::Y);
        assert_matrix_near(&view, &expected.into());
    }

    #[test]
    fn inverse_round_trips_to_identity() {
        for eye in [
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(10.0, 10.0, 5.0),
            Vector3::new(-10.0, 3.5, 5.0),
            Vector3::new(2.0, -9.0, -4.0),
        ] {
            let m = Matrix4::look_at(eye, Vector3::new(0.5, 0.0, 0.0), Vector3::Y).unwrap();
            let inv = m.inverse().unwrap();
            assert_matrix_near(&(inv * m), &Matrix4::IDENTITY);
            assert_matrix_near(&(m * inv), &Matrix4::IDENTITY);
        }
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let zero_row = Matrix4::from_elements([
            1.0, 2.0, 3.0, 0.0, //
            0.0, 0.0, 0.0, 0.0, //
            4.0, 5.0, 6.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        assert_eq!(zero_row.inverse(), Err(MathError::SingularMatrix));

        let repeated_row = Matrix4::from_elements([
            1.0, 2.0, 3.0, 4.0, //
            1.0, 2.0, 3.0, 4.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 1.0,
        ]);
        assert_eq!(repeated_row.determinant(), 0.0);
        assert_eq!(repeated_row.inverse(), Err(MathError::SingularMatrix));
    }

    #[test]
    fn degenerate_look_at_is_an_error() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(
            Matrix4::look_at(p, p, Vector3::Y),
            Err(MathError::DegenerateVector)
        );
        assert_eq!(
            Matrix4::look_at(Vector3::new(0.0, 5.0, 0.0), Vector3::ZERO, Vector3::Y),
            Err(MathError::DegenerateVector)
        );
    }

    #[test]
    fn look_to_forward_axis_is_the_direction() {
        let dir = Vector3::new(1.0, -2.0, -3.0).norm();
        let m = Matrix4::look_to(dir, Vector3::Y).unwrap();
        let forward = m.transform_direction(Vector3::NEG_Z);
        assert!((forward - dir).length() < EPS);
        assert_eq!(m.translation(), Vector3::ZERO);
    }
}
