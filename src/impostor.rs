//! The impostor technique: billboard expansion and analytic sphere shading.
//!
//! The GPU implementation lives in `shaders/impostor.wgsl`. This module holds
//! the shared constants, the uniform layout, and CPU mirrors of both shader
//! stages so the geometry and lighting can be checked without a device.
//!
//! # Vertex stage
//!
//! Six vertex invocations, no vertex buffer. Each `vertex_index` picks one of four
//! quad corners through [`QUAD_INDICES`]; the corner is scaled by `size` and
//! transformed by the model-view-projection matrix.
//!
//! # Fragment stage
//!
//! The interpolated UV is remapped to `st ∈ [-1, 1]²`. Fragments with `|st| > 1`
//! are discarded, leaving a disc. Inside the disc the visible hemisphere point is
//! `size · (st.x, st.y, sqrt(1 − |st|²))`; its normal is rotated to world space
//! by the model matrix and lit by one directional light.

use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// Quad corners in the object's local XY plane.
pub const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
];

/// Texture coordinates for each corner of [`QUAD_POSITIONS`].
pub const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Two triangles over the four corners.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 3, 2, 1];

/// Number of vertices issued per draw.
pub const VERTEX_COUNT: u32 = QUAD_INDICES.len() as u32;

/// Un-normalized light direction; the shader normalizes it.
pub const LIGHT_DIRECTION: [f32; 3] = [0.0, 1.0, 1.0];
pub const AMBIENT: [f32; 3] = [0.2, 0.2, 0.2];
pub const DIFFUSE: [f32; 3] = [0.3, 0.5, 0.8];

/// Uniform block shared by both shader stages.
///
/// Bound at `@group(0) @binding(0)`. The matrices are [`Matrix4::elements`],
/// which WGSL reads as column-major `mat4x4<f32>`.
///
/// # WGSL Declaration
///
/// ```wgsl
/// struct Uniforms {
///     model_matrix: mat4x4<f32>,
///     vp_matrix: mat4x4<f32>,
///     mvp_matrix: mat4x4<f32>,
///     size: f32,
/// }
/// @group(0) @binding(0) var<uniform> u: Uniforms;
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ImpostorUniforms {
    /// Object to world.
    pub model_matrix: [f32; 16],
    /// World to clip.
    pub vp_matrix: [f32; 16],
    /// Object to clip.
    pub mvp_matrix: [f32; 16],
    /// Sphere radius.
    pub size: f32,
    /// Padding for 16-byte alignment.
    pub _padding: [f32; 3],
}

impl ImpostorUniforms {
    pub fn new(model: &Matrix4, vp: &Matrix4, mvp: &Matrix4, size: f32) -> Self {
        Self {
            model_matrix: model.elements(),
            vp_matrix: vp.elements(),
            mvp_matrix: mvp.elements(),
            size,
            _padding: [0.0; 3],
        }
    }
}

/// Output of the vertex stage for one invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BillboardVertex {
    pub clip_position: [f32; 4],
    pub uv: [f32; 2],
}

/// CPU mirror of the vertex stage.
///
/// # Panics
///
/// Panics if `vertex_index >= 6`; the draw never issues more vertices.
pub fn billboard_vertex(vertex_index: u32, size: f32, mvp: &Matrix4) -> BillboardVertex {
    let corner = QUAD_INDICES[vertex_index as usize] as usize;
    let [x, y, z] = QUAD_POSITIONS[corner];
    BillboardVertex {
        clip_position: mvp.transform([size * x, size * y, size * z, 1.0]),
        uv: QUAD_UVS[corner],
    }
}

/// Visible hemisphere point for a fragment, or `None` outside the silhouette.
pub fn reconstruct_surface(uv: [f32; 2], size: f32) -> Option<Vector3> {
    let st = [uv[0] * 2.0 - 1.0, uv[1] * 2.0 - 1.0];
    let r2 = st[0] * st[0] + st[1] * st[1];
    if r2.sqrt() > 1.0 {
        return None;
    }
    let z = (1.0 - r2).max(0.0).sqrt();
    Some(Vector3::new(st[0], st[1], z) * size)
}

/// CPU mirror of the fragment stage. Returns `None` for discarded fragments.
pub fn shade_fragment(uv: [f32; 2], size: f32, model: &Matrix4) -> Option<[f32; 4]> {
    let point = reconstruct_surface(uv, size)?;
    let normal = point.norm();
    let world_normal = model.transform_direction(normal);

    let light = Vector3::from(LIGHT_DIRECTION).norm();
    let lambert = world_normal.dot(light).clamp(0.0, 1.0);

    Some([
        AMBIENT[0] + DIFFUSE[0] * lambert,
        AMBIENT[1] + DIFFUSE[1] * lambert,
        AMBIENT[2] + DIFFUSE[2] * lambert,
        1.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn uniform_block_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<ImpostorUniforms>(), 208);
        assert_eq!(std::mem::offset_of!(ImpostorUniforms, vp_matrix), 64);
        assert_eq!(std::mem::offset_of!(ImpostorUniforms, mvp_matrix), 128);
        assert_eq!(std::mem::offset_of!(ImpostorUniforms, size), 192);
    }

    #[test]
    fn six_invocations_cover_four_distinct_corners() {
        let vertices: Vec<_> = (0..VERTEX_COUNT)
            .map(|i| billboard_vertex(i, 1.0, &Matrix4::IDENTITY))
            .collect();

        assert_eq!(vertices[0].uv, [0.0, 0.0]);
        assert_eq!(vertices[1].uv, [1.0, 0.0]);
        assert_eq!(vertices[2].uv, [0.0, 1.0]);
        assert_eq!(vertices[3].uv, [1.0, 1.0]);
        // Second triangle shares the diagonal with the first.
        assert_eq!(vertices[4], vertices[2]);
        assert_eq!(vertices[5], vertices[1]);
    }

    #[test]
    fn size_scales_corner_extent() {
        let v = billboard_vertex(3, 2.5, &Matrix4::IDENTITY);
        assert_eq!(v.clip_position, [2.5, 2.5, 0.0, 1.0]);

        let moved = billboard_vertex(0, 1.0, &Matrix4::translate(0.0, 0.0, -3.0));
        assert_eq!(moved.clip_position, [-1.0, -1.0, -3.0, 1.0]);
    }

    #[test]
    fn quad_corners_are_discarded() {
        for uv in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]] {
            assert_eq!(shade_fragment(uv, 1.0, &Matrix4::IDENTITY), None);
        }
    }

    #[test]
    fn disc_edge_is_kept() {
        assert!(shade_fragment([1.0, 0.5], 1.0, &Matrix4::IDENTITY).is_some());
        assert!(shade_fragment([0.5, 0.0], 1.0, &Matrix4::IDENTITY).is_some());
    }

    #[test]
    fn centre_reconstructs_the_pole() {
        let point = reconstruct_surface([0.5, 0.5], 3.0).unwrap();
        assert_eq!(point, Vector3::new(0.0, 0.0, 3.0));
        assert!((point.norm() - Vector3::Z).length() < EPS);
    }

    #[test]
    fn centre_is_lit_at_forty_five_degrees() {
        let color = shade_fragment([0.5, 0.5], 1.0, &Matrix4::IDENTITY).unwrap();
        let lambert = std::f32::consts::FRAC_1_SQRT_2;
        assert!((color[0] - (0.2 + 0.3 * lambert)).abs() < EPS);
        assert!((color[1] - (0.2 + 0.5 * lambert)).abs() < EPS);
        assert!((color[2] - (0.2 + 0.8 * lambert)).abs() < EPS);
        assert_eq!(color[3], 1.0);
    }

    #[test]
    fn surfaces_facing_away_from_light_get_ambient_only() {
        // Bottom of the disc: normal (0, -1, 0) after the identity model.
        let color = shade_fragment([0.5, 0.0], 1.0, &Matrix4::IDENTITY).unwrap();
        assert!((color[0] - 0.2).abs() < EPS);
        assert!((color[1] - 0.2).abs() < EPS);
        assert!((color[2] - 0.2).abs() < EPS);
    }

    #[test]
    fn model_rotation_turns_the_normal() {
        // Turn the billboard to face +Y: the pole normal now points at +Y.
        let model = Matrix4::look_to(Vector3::new(0.0, -1.0, 0.0), Vector3::Z).unwrap();
        let color = shade_fragment([0.5, 0.5], 1.0, &model).unwrap();
        let lambert = std::f32::consts::FRAC_1_SQRT_2;
        assert!((color[2] - (0.2 + 0.8 * lambert)).abs() < 1e-4);

        let unlit = Matrix4::look_to(Vector3::new(0.0, 1.0, 0.0), Vector3::Z).unwrap();
        let color = shade_fragment([0.5, 0.5], 1.0, &unlit).unwrap();
        assert!((color[2] - 0.2).abs() < 1e-4);
    }

    fn wgsl_vector(ty: &str, components: &[f32]) -> String {
        let parts: Vec<String> = components.iter().map(|c| format!("{c:?}")).collect();
        format!("{ty}({})", parts.join(","))
    }

    #[test]
    fn shader_constants_match_cpu_tables() {
        let shader: String = crate::shader::IMPOSTOR_WGSL.split_whitespace().collect();

        let indices: Vec<String> = QUAD_INDICES.iter().map(|i| format!("{i}u")).collect();
        let positions: Vec<String> = QUAD_POSITIONS
            .iter()
            .map(|p| wgsl_vector("vec3f", p))
            .collect();
        let uvs: Vec<String> = QUAD_UVS.iter().map(|uv| wgsl_vector("vec2f", uv)).collect();

        let expected = [
            format!("array<u32,{}>({})", QUAD_INDICES.len(), indices.join(",")),
            format!("array<vec3f,4>({},)", positions.join(",")),
            format!("array<vec2f,4>({},)", uvs.join(",")),
            format!("normalize({})", wgsl_vector("vec3f", &LIGHT_DIRECTION)),
            format!("ambient={}", wgsl_vector("vec3f", &AMBIENT)),
            format!("diffuse={}", wgsl_vector("vec3f", &DIFFUSE)),
        ];
        for snippet in expected {
            assert!(shader.contains(&snippet), "shader is missing `{snippet}`");
        }
    }
}
