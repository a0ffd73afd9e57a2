use crate::error::Result;
use crate::pipeline::shaders::phong::RenderState;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub textures: TextureConfig,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,

    // --- Clear colors ---
    #[serde(default = "default_background")]
    pub background_color: [f32; 3],
    #[serde(default = "default_uniform")]
    pub uniform_color: [f32; 3],
    #[serde(default)]
    pub use_uniform_color: bool,

    // --- Shading toggles ---
    #[serde(default = "default_true")]
    pub use_normal_map: bool,
    #[serde(default = "default_true")]
    pub rotate: bool,
    #[serde(default)]
    pub render_state: RenderState,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            background_color: default_background(),
            uniform_color: default_uniform(),
            use_uniform_color: false,
            use_normal_map: true,
            rotate: true,
            render_state: RenderState::default(),
        }
    }
}

fn default_width() -> usize {
    1280
}
fn default_height() -> usize {
    720
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_background() -> [f32; 3] {
    let gray = 100.0 / 255.0;
    [gray, gray, gray]
}
fn default_uniform() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_origin")]
    pub origin: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Initial yaw in degrees.
    #[serde(default)]
    pub yaw: f32,
    /// Initial pitch in degrees.
    #[serde(default)]
    pub pitch: f32,
    /// Units per second.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Radians per pixel of mouse drag.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: default_camera_origin(),
            fov: default_fov(),
            yaw: 0.0,
            pitch: 0.0,
            speed: default_speed(),
            sensitivity: default_sensitivity(),
        }
    }
}

fn default_camera_origin() -> [f32; 3] {
    [0.0, 0.0, -5.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_speed() -> f32 {
    2.0
}
fn default_sensitivity() -> f32 {
    0.005
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_intensity(),
            ambient: default_ambient(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_intensity() -> f32 {
    7.0
}
fn default_ambient() -> [f32; 3] {
    [0.025, 0.025, 0.025]
}

#[derive(Debug, Deserialize)]
pub struct MeshConfig {
    /// OBJ file; the built-in cube when absent.
    #[serde(default)]
    pub path: Option<String>,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            path: None,
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: default_scale(),
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Texture paths; any missing map falls back to a solid 1x1 texture.
#[derive(Debug, Default, Deserialize)]
pub struct TextureConfig {
    pub diffuse: Option<String>,
    pub normal: Option<String>,
    pub specular: Option<String>,
    pub gloss: Option<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RasterError;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.render.width, 1280);
        assert_eq!(config.render.height, 720);
        assert!(config.render.use_normal_map);
        assert!(config.render.rotate);
        assert!(!config.render.use_uniform_color);
        assert_eq!(config.render.render_state, RenderState::Combined);
        assert_eq!(config.camera.origin, [0.0, 0.0, -5.0]);
        assert_eq!(config.light.intensity, 7.0);
        assert!(config.mesh.path.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [render]
            width = 320
            render_state = "observed-area"

            [mesh]
            scale = [2.0, 2.0, 2.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.height, 720);
        assert_eq!(config.render.render_state, RenderState::ObservedArea);
        assert_eq!(config.mesh.scale, [2.0, 2.0, 2.0]);
        assert_eq!(config.mesh.rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn stale_mesh_keys_are_ignored() {
        let config = Config::parse(
            r#"
            [mesh]
            path = "model.obj"
            topology = "triangle-strip"
            "#,
        )
        .unwrap();
        assert_eq!(config.mesh.path.as_deref(), Some("model.obj"));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = Config::parse("[render\nwidth = ").unwrap_err();
        assert!(matches!(err, RasterError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera]\nfov = 90.0\norigin = [1.0, 2.0, 3.0]").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.camera.fov, 90.0);
        assert_eq!(config.camera.origin, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, RasterError::Io(_)));
    }
}
