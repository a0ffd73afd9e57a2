use nalgebra::{Point2, Point3, Vector2, Vector3, Vector4};

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Texture coordinates (UV).
    pub texcoord: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector for normal mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(
        position: Point3<f32>,
        texcoord: Vector2<f32>,
        normal: Vector3<f32>,
        tangent: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            texcoord,
            normal,
            tangent,
        }
    }
}

/// Output of the vertex transformer.
///
/// `position.xyz` holds NDC after the perspective divide, `position.w` keeps the
/// pre-divide clip w for perspective-correct interpolation.
#[derive(Debug, Clone, Copy)]
pub struct TransformedVertex {
    pub position: Vector4<f32>,
    pub uv: Vector2<f32>,
    /// World-space, normalized.
    pub normal: Vector3<f32>,
    /// World-space, normalized.
    pub tangent: Vector3<f32>,
    /// From the camera origin towards the vertex, normalized.
    pub view_direction: Vector3<f32>,
}

impl Default for TransformedVertex {
    fn default() -> Self {
        Self {
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            uv: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
            view_direction: Vector3::zeros(),
        }
    }
}

impl TransformedVertex {
    /// Whether the NDC x and y lie inside the [-1, 1] square.
    #[inline]
    pub fn is_inside_ndc(&self) -> bool {
        (-1.0..=1.0).contains(&self.position.x) && (-1.0..=1.0).contains(&self.position.y)
    }
}

/// A fully interpolated pixel, ready for shading.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub pixel: Point2<usize>,
    /// Interpolated NDC depth in [0, 1].
    pub depth: f32,
    /// Interpolated clip w.
    pub w: f32,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub view_direction: Vector3<f32>,
}

/// Normalizes `v`, returning zero for vectors too short to normalize.
#[inline]
pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
}
