use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-6;

/// Signed area test: 2D cross product of `(b - a)` and `(p - a)`.
///
/// Non-negative means `p` is on the inside of edge `a -> b` for triangles that
/// are clockwise on screen (y down).
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let edge = b - a;
    let to_p = p - a;
    edge.x * to_p.y - edge.y * to_p.x
}

/// Computes the screen-space barycentric weights of `p` in triangle (v0, v1, v2).
///
/// Returns `None` when `p` lies outside any edge (closed half-planes: a point
/// exactly on an edge is inside) or when the triangle has zero area.
///
/// # Returns
/// A Vector3 where:
/// - x: weight for v0 (from edge v1 -> v2)
/// - y: weight for v1 (from edge v2 -> v0)
/// - z: weight for v2 (from edge v0 -> v1)
pub fn barycentric_weights(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let edge_ab = edge_function(v0, v1, p);
    if edge_ab < 0.0 {
        return None;
    }
    let edge_bc = edge_function(v1, v2, p);
    if edge_bc < 0.0 {
        return None;
    }
    let edge_ca = edge_function(v2, v0, p);
    if edge_ca < 0.0 {
        return None;
    }

    let total = edge_ab + edge_bc + edge_ca;
    if total <= 0.0 {
        return None;
    }
    let inv_total = 1.0 / total;
    Some(Vector3::new(
        edge_bc * inv_total,
        edge_ca * inv_total,
        edge_ab * inv_total,
    ))
}

/// Reciprocal that never divides by an exact zero: tiny magnitudes are clamped
/// to a signed epsilon.
#[inline(always)]
pub fn safe_recip(value: f32) -> f32 {
    if value.abs() < EPSILON {
        1.0 / EPSILON.copysign(value)
    } else {
        1.0 / value
    }
}

/// Interpolates the reciprocal of a per-vertex quantity: `Σ wᵢ / qᵢ`.
#[inline]
pub fn interpolate_reciprocal(weights: &Vector3<f32>, q: [f32; 3]) -> f32 {
    weights.x * safe_recip(q[0]) + weights.y * safe_recip(q[1]) + weights.z * safe_recip(q[2])
}

/// Perspective-correct attribute interpolation.
///
/// `inv_ws` are the per-vertex `1 / w`, `interpolated_w` is `1 / Σ wᵢ / wᵢ`.
#[inline]
pub fn perspective_interpolate<T: Interpolatable>(
    attributes: [T; 3],
    weights: &Vector3<f32>,
    inv_ws: &[f32; 3],
    interpolated_w: f32,
) -> T {
    (attributes[0] * (weights.x * inv_ws[0])
        + attributes[1] * (weights.y * inv_ws[1])
        + attributes[2] * (weights.z * inv_ws[2]))
        * interpolated_w
}
