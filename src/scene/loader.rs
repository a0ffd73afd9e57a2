use crate::core::math::transform::TransformFactory;
use crate::core::topology::Topology;
use crate::io::config::{CameraConfig, Config, LightConfig, MeshConfig, TextureConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::{RenderContext, Scene};
use crate::scene::light::Light;
use crate::scene::material::MaterialMaps;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use log::{info, warn};
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::Arc;

pub fn build_camera_from_config(config: &CameraConfig, width: usize, height: usize) -> Camera {
    let aspect_ratio = width as f32 / height as f32;
    let mut camera = Camera::new(Point3::from(config.origin), config.fov, aspect_ratio);
    if config.yaw != 0.0 || config.pitch != 0.0 {
        camera.rotate(config.yaw.to_radians(), config.pitch.to_radians());
    }
    camera
}

pub fn build_light_from_config(config: &LightConfig) -> Light {
    let direction = Vector3::from(config.direction);
    if direction.norm() < 1e-6 {
        warn!("Light direction is zero. Using default light.");
        return Light::default();
    }
    Light::new(direction, config.intensity, Vector3::from(config.ambient))
}

pub fn world_matrix_from_config(config: &MeshConfig) -> Matrix4<f32> {
    TransformFactory::world(
        &Vector3::from(config.position),
        &Vector3::from(config.rotation),
        &Vector3::from(config.scale),
    )
}

/// Loads the configured OBJ, or the built-in cube when there is none or it fails.
pub fn build_mesh_from_config(config: &MeshConfig) -> Mesh {
    let world = world_matrix_from_config(config);

    let Some(path) = &config.path else {
        info!("No mesh configured. Using built-in cube.");
        return Mesh::unit_cube(world);
    };

    // Faces come back triangulated.
    match load_obj(path) {
        Ok((vertices, indices)) => Mesh::new(vertices, indices, Topology::TriangleList, world),
        Err(e) => {
            warn!("Error loading mesh '{}': {}. Using built-in cube.", path, e);
            Mesh::unit_cube(world)
        }
    }
}

/// Loads every configured map; missing ones keep the solid default.
pub fn build_maps_from_config(config: &TextureConfig) -> MaterialMaps {
    let defaults = MaterialMaps::default();
    MaterialMaps {
        diffuse: load_or(config.diffuse.as_deref(), "diffuse", defaults.diffuse),
        normal: load_or(config.normal.as_deref(), "normal", defaults.normal),
        specular: load_or(config.specular.as_deref(), "specular", defaults.specular),
        gloss: load_or(config.gloss.as_deref(), "gloss", defaults.gloss),
    }
}

fn load_or(path: Option<&str>, kind: &str, fallback: Arc<Texture>) -> Arc<Texture> {
    let Some(path) = path else {
        return fallback;
    };
    match Texture::load(path) {
        Ok(tex) => Arc::new(tex),
        Err(e) => {
            warn!("Failed to load {} texture '{}': {}. Using solid fallback.", kind, path, e);
            fallback
        }
    }
}

/// Initial resource loading (Heavy I/O). Returns a RenderContext.
pub fn init_scene_resources(config: &Config) -> RenderContext {
    let camera = build_camera_from_config(&config.camera, config.render.width, config.render.height);
    let light = build_light_from_config(&config.light);
    let mesh = build_mesh_from_config(&config.mesh);
    let maps = build_maps_from_config(&config.textures);

    info!(
        "Scene initialized: {} vertices, {} indices ({:?}).",
        mesh.vertices().len(),
        mesh.indices().len(),
        mesh.topology
    );

    RenderContext {
        camera,
        scene: Scene {
            light,
            meshes: vec![mesh],
            maps,
        },
    }
}
