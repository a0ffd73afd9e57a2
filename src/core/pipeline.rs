use crate::core::geometry::Fragment;
use nalgebra::{Vector2, Vector3};
use std::ops::{Add, Mul};

/// Trait for values that can be interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy: cheaply duplicable per-vertex values.
/// - Add + Mul<f32>: linear combination used by barycentric interpolation.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl Interpolatable for f32 {}
impl Interpolatable for Vector2<f32> {}
impl Interpolatable for Vector3<f32> {}

/// The per-pixel stage of the pipeline.
///
/// Vertex processing is fixed-function here (see `transform_vertices`); only
/// fragment coloring is pluggable.
pub trait FragmentShader {
    /// Computes the linear RGB color for one fragment.
    ///
    /// The rasterizer applies max-to-one and saturation afterwards, so values
    /// above 1.0 are allowed.
    fn shade(&self, fragment: &Fragment) -> Vector3<f32>;
}
