use crate::core::geometry::{TransformedVertex, Vertex, normalize_or_zero};
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3, Vector4};

/// Below this magnitude a clip w is treated as zero.
const W_EPSILON: f32 = 1e-6;

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating transformation matrices.
/// Left-handed: +X right, +Y up, +Z into the screen. Column vectors, so a
/// row-vector chain `world * view * projection` becomes `projection * view * world`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Euler rotation in degrees, applied X then Y then Z.
    pub fn rotation_euler_deg(degrees: &Vector3<f32>) -> Matrix4<f32> {
        Self::rotation_z(degrees.z.to_radians())
            * Self::rotation_y(degrees.y.to_radians())
            * Self::rotation_x(degrees.x.to_radians())
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Scale, then rotate, then translate.
    pub fn world(position: &Vector3<f32>, rotation_deg: &Vector3<f32>, scale: &Vector3<f32>) -> Matrix4<f32> {
        Self::translation(position) * Self::rotation_euler_deg(rotation_deg) * Self::scaling_nonuniform(scale)
    }

    /// Camera-to-world matrix: columns are right, up, forward and origin.
    pub fn orthonormal_basis(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// Closed-form inverse of an orthonormal basis matrix (world-to-camera).
    pub fn view_from_basis(basis: &Matrix4<f32>) -> Matrix4<f32> {
        let rotation: Matrix3<f32> = basis.fixed_view::<3, 3>(0, 0).into_owned();
        let origin = Vector3::new(basis[(0, 3)], basis[(1, 3)], basis[(2, 3)]);
        let rotation_t = rotation.transpose();
        let translation = -(rotation_t * origin);

        let mut view = rotation_t.to_homogeneous();
        view[(0, 3)] = translation.x;
        view[(1, 3)] = translation.y;
        view[(2, 3)] = translation.z;
        view
    }

    /// Creates a left-handed perspective projection with depth mapped to [0, 1].
    pub fn perspective_lh(fov_y_rad: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let y_scale = 1.0 / (fov_y_rad / 2.0).tan();
        let x_scale = y_scale / aspect_ratio;
        let range = far / (far - near);

        Matrix4::new(
            x_scale, 0.0,     0.0,   0.0,
            0.0,     y_scale, 0.0,   0.0,
            0.0,     0.0,     range, -near * range,
            0.0,     0.0,     1.0,   0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division on x, y and z, keeping the pre-divide w.
///
/// A clip w of (near) zero cannot be divided; the vertex is pushed far outside
/// the NDC square so any triangle using it is discarded.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Vector4<f32> {
    let w = clip.w;
    if w.abs() > W_EPSILON {
        Vector4::new(clip.x / w, clip.y / w, clip.z / w, w)
    } else {
        Vector4::new(f32::MAX, f32::MAX, f32::MAX, w)
    }
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) / 2.0 * width,
        (1.0 - ndc_y) / 2.0 * height,
    )
}

/// Transforms a mesh's vertices into `out`, one output per input.
///
/// `out` must already be sized to `vertices`; nothing is allocated.
pub fn transform_vertices(
    vertices: &[Vertex],
    out: &mut [TransformedVertex],
    world: &Matrix4<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
    camera_origin: &Point3<f32>,
) {
    debug_assert_eq!(vertices.len(), out.len());

    let world_view_projection = projection * view * world;
    let world_linear = world.fixed_view::<3, 3>(0, 0);

    for (input, output) in vertices.iter().zip(out.iter_mut()) {
        let homogeneous = input.position.to_homogeneous();
        let clip = world_view_projection * homogeneous;
        let world_pos = (world * homogeneous).xyz();

        output.position = apply_perspective_division(&clip);
        output.uv = input.texcoord;
        output.normal = normalize_or_zero(world_linear * input.normal);
        output.tangent = normalize_or_zero(world_linear * input.tangent);
        output.view_direction = normalize_or_zero(world_pos - camera_origin.coords);
    }
}
