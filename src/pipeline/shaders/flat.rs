use crate::core::geometry::Fragment;
use crate::core::pipeline::FragmentShader;
use nalgebra::Vector3;

/// A shader that paints every fragment with one color.
/// Useful for debugging coverage and depth ordering.
pub struct FlatShader {
    pub color: Vector3<f32>,
}

impl FlatShader {
    pub fn new(color: Vector3<f32>) -> Self {
        Self { color }
    }
}

impl FragmentShader for FlatShader {
    fn shade(&self, _fragment: &Fragment) -> Vector3<f32> {
        self.color
    }
}
