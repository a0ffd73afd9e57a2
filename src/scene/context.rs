use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::material::MaterialMaps;
use crate::scene::mesh::Mesh;

/// What a backend draws: meshes, their shared texture set and the light.
pub struct Scene {
    pub light: Light,
    pub meshes: Vec<Mesh>,
    pub maps: MaterialMaps,
}

/// Holds all scene resources required for rendering.
///
/// The camera is kept apart from the scene so every backend can share it.
pub struct RenderContext {
    pub camera: Camera,
    pub scene: Scene,
}
