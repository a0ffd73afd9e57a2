use crate::scene::camera::Camera;
use minifb::{Key, MouseButton, MouseMode, Window};
use nalgebra::Vector3;

/// Degrees of FOV per scroll-wheel unit.
const ZOOM_STEP_DEG: f32 = 2.0;

/// Pure movement/look input for one frame, independent of the window.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CameraInput {
    /// x: strafe right, y: world up, z: forward. Each in [-1, 1].
    pub movement: Vector3<f32>,
    /// Mouse drag in pixels since the previous frame.
    pub look_delta: (f32, f32),
    pub scroll: f32,
}

pub struct CameraController {
    // Movement parameters
    pub speed: f32,
    pub sensitivity: f32,

    last_mouse_pos: Option<(f32, f32)>,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            last_mouse_pos: None,
        }
    }

    /// Reads WASD/Space/LeftShift, right-drag and the scroll wheel.
    pub fn poll(&mut self, window: &Window) -> CameraInput {
        let mut input = CameraInput::default();

        if let Some((_, scroll_y)) = window.get_scroll_wheel() {
            input.scroll = scroll_y;
        }

        let axis = |pos: Key, neg: Key| {
            (window.is_key_down(pos) as i32 - window.is_key_down(neg) as i32) as f32
        };
        input.movement = Vector3::new(
            axis(Key::D, Key::A),
            axis(Key::Space, Key::LeftShift),
            axis(Key::W, Key::S),
        );

        if window.get_mouse_down(MouseButton::Right) {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) {
                if let Some((last_x, last_y)) = self.last_mouse_pos {
                    input.look_delta = (x - last_x, y - last_y);
                }
                self.last_mouse_pos = Some((x, y));
            }
        } else {
            self.last_mouse_pos = None;
        }

        input
    }

    /// Moves, turns and zooms `camera`. Matrices are only rebuilt when something changed.
    pub fn apply(&self, input: &CameraInput, camera: &mut Camera, dt: f32) {
        if input.scroll != 0.0 {
            camera.set_fov(camera.fov() - input.scroll * ZOOM_STEP_DEG);
        }

        let (dx, dy) = input.look_delta;
        if dx != 0.0 || dy != 0.0 {
            // Positive pitch tilts forward down, like screen y.
            camera.rotate(dx * self.sensitivity, dy * self.sensitivity);
        }

        let m = input.movement;
        let direction = camera.right * m.x + Vector3::y() * m.y + camera.forward * m.z;
        if direction.norm_squared() > 1e-6 {
            camera.translate(&(direction.normalize() * self.speed * dt));
        }
    }

    pub fn update(&mut self, window: &Window, camera: &mut Camera, dt: f32) {
        let input = self.poll(window);
        self.apply(&input, camera, dt);
    }
}
