use crate::scene::texture::Texture;
use nalgebra::Vector3;
use std::sync::Arc;

/// The texture set sampled by the pixel shader.
#[derive(Debug, Clone)]
pub struct MaterialMaps {
    /// Albedo.
    pub diffuse: Arc<Texture>,
    /// Tangent-space normals encoded in [0, 1].
    pub normal: Arc<Texture>,
    /// Specular intensity in the red channel.
    pub specular: Arc<Texture>,
    /// Specular exponent in the red channel, scaled by the shininess constant.
    pub gloss: Arc<Texture>,
}

impl Default for MaterialMaps {
    fn default() -> Self {
        Self {
            diffuse: Arc::new(Texture::solid(Vector3::new(0.8, 0.8, 0.8))),
            // (0, 0, 1) in tangent space: the unperturbed normal
            normal: Arc::new(Texture::solid(Vector3::new(0.5, 0.5, 1.0))),
            specular: Arc::new(Texture::solid(Vector3::new(0.5, 0.5, 0.5))),
            gloss: Arc::new(Texture::solid(Vector3::new(0.5, 0.5, 0.5))),
        }
    }
}
