use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::TransformedVertex;
use crate::core::math::transform::transform_vertices;
use crate::core::rasterizer::Rasterizer;
use crate::error::Result;
use crate::io::config::RenderConfig;
use crate::pipeline::backend::{Command, RenderBackend};
use crate::pipeline::shaders::phong::{PhongShader, RenderState};
use crate::scene::camera::Camera;
use crate::scene::context::Scene;
use log::{debug, info};
use nalgebra::Vector3;
use std::f32::consts::FRAC_PI_4;

/// Radians per second the meshes spin around their local Y axis.
pub const ROTATION_SPEED: f32 = FRAC_PI_4;

/// Runtime switches of the software renderer.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub render_state: RenderState,
    pub use_normal_map: bool,
    pub rotating: bool,
    pub use_uniform_color: bool,
    pub background_color: Vector3<f32>,
    pub uniform_color: Vector3<f32>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderSettings {
    fn from(config: &RenderConfig) -> Self {
        Self {
            render_state: config.render_state,
            use_normal_map: config.use_normal_map,
            rotating: config.rotate,
            use_uniform_color: config.use_uniform_color,
            background_color: Vector3::from(config.background_color),
            uniform_color: Vector3::from(config.uniform_color),
        }
    }
}

/// The CPU rasterization backend.
///
/// Owns the framebuffer and one transformed-vertex arena per mesh; both are
/// allocated here and reused every frame.
pub struct SoftwareRenderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    pub scene: Scene,
    pub settings: RenderSettings,
    arenas: Vec<Vec<TransformedVertex>>,
    last_shaded: usize,
}

impl SoftwareRenderer {
    pub fn new(width: usize, height: usize, scene: Scene, settings: RenderSettings) -> Result<Self> {
        let framebuffer = FrameBuffer::new(width, height)?;
        let arenas = scene
            .meshes
            .iter()
            .map(|mesh| vec![TransformedVertex::default(); mesh.vertices().len()])
            .collect();

        Ok(Self {
            rasterizer: Rasterizer::new(),
            framebuffer,
            scene,
            settings,
            arenas,
            last_shaded: 0,
        })
    }

    pub fn clear_color(&self) -> Vector3<f32> {
        if self.settings.use_uniform_color {
            self.settings.uniform_color
        } else {
            self.settings.background_color
        }
    }

    /// Pixels shaded during the last frame.
    pub fn last_shaded(&self) -> usize {
        self.last_shaded
    }

    /// Draws one frame: clear, transform every mesh, walk and rasterize.
    pub fn draw(&mut self, camera: &Camera) {
        self.framebuffer.clear(self.clear_color(), f32::INFINITY);

        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let shader = PhongShader::new(
            &self.scene.light,
            &self.scene.maps,
            self.settings.render_state,
            self.settings.use_normal_map,
        );

        let mut shaded = 0;
        for (mesh, arena) in self.scene.meshes.iter().zip(self.arenas.iter_mut()) {
            transform_vertices(
                mesh.vertices(),
                arena,
                &mesh.world_matrix,
                &view,
                &projection,
                &camera.origin,
            );

            for [i0, i1, i2] in mesh.topology.triangles(mesh.indices()) {
                let (Some(v0), Some(v1), Some(v2)) = (
                    arena.get(i0 as usize),
                    arena.get(i1 as usize),
                    arena.get(i2 as usize),
                ) else {
                    continue;
                };
                shaded += self.rasterizer.rasterize_triangle(
                    &mut self.framebuffer,
                    &shader,
                    [v0, v1, v2],
                );
            }
        }

        self.last_shaded = shaded;
        debug!("Frame done: {} pixels shaded", shaded);
    }
}

impl RenderBackend for SoftwareRenderer {
    fn name(&self) -> &str {
        "software"
    }

    fn update(&mut self, dt: f32) {
        if !self.settings.rotating {
            return;
        }
        for mesh in &mut self.scene.meshes {
            mesh.rotate_y(ROTATION_SPEED * dt);
        }
    }

    fn render(&mut self, camera: &Camera) {
        self.draw(camera);
    }

    fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    fn handle(&mut self, command: Command) -> bool {
        let s = &mut self.settings;
        match command {
            Command::CycleRenderState => {
                s.render_state = s.render_state.next();
                info!("Render state: {}", s.render_state);
            }
            Command::ToggleNormalMap => {
                s.use_normal_map = !s.use_normal_map;
                info!("Normal map: {}", on_off(s.use_normal_map));
            }
            Command::ToggleRotation => {
                s.rotating = !s.rotating;
                info!("Rotation: {}", on_off(s.rotating));
            }
            Command::ToggleUniformColor => {
                s.use_uniform_color = !s.use_uniform_color;
                info!("Uniform clear color: {}", on_off(s.use_uniform_color));
            }
        }
        true
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
