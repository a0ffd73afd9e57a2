use nalgebra::Vector3;

/// The single directional light of the scene plus the ambient term.
#[derive(Debug, Clone)]
pub struct Light {
    /// Direction the light travels, normalized.
    pub direction: Vector3<f32>,
    pub intensity: f32,
    pub ambient: Vector3<f32>,
}

impl Light {
    pub fn new(direction: Vector3<f32>, intensity: f32, ambient: Vector3<f32>) -> Self {
        Self {
            direction: direction.normalize(),
            intensity,
            ambient,
        }
    }

    /// Direction FROM a surface point TO the light.
    pub fn direction_to_light(&self) -> Vector3<f32> {
        -self.direction
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(
            Vector3::new(0.577, -0.577, 0.577),
            7.0,
            Vector3::new(0.025, 0.025, 0.025),
        )
    }
}
