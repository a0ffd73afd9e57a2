use crate::core::framebuffer::FrameBuffer;
use crate::scene::camera::Camera;
use log::{debug, info, warn};
use std::fmt;

/// Runtime toggles the window forwards to the backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CycleRenderState,
    ToggleNormalMap,
    ToggleRotation,
    ToggleUniformColor,
}

impl Command {
    /// Shared commands go to every backend so switching keeps them in sync.
    /// The rest only reach the active backend.
    pub fn is_shared(self) -> bool {
        matches!(self, Command::ToggleRotation | Command::ToggleUniformColor)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::CycleRenderState => "cycle render state",
            Command::ToggleNormalMap => "toggle normal map",
            Command::ToggleRotation => "toggle rotation",
            Command::ToggleUniformColor => "toggle uniform color",
        };
        f.write_str(name)
    }
}

/// Something that can draw the scene into a framebuffer.
pub trait RenderBackend {
    fn name(&self) -> &str;

    /// Advances animation by `dt` seconds.
    fn update(&mut self, dt: f32);

    fn render(&mut self, camera: &Camera);

    /// The last rendered frame.
    fn framebuffer(&self) -> &FrameBuffer;

    /// Applies `command`; returns false if this backend does not support it.
    fn handle(&mut self, command: Command) -> bool;
}

/// Owns the camera and every backend; one of them is active at a time.
pub struct RenderManager {
    pub camera: Camera,
    backends: Vec<Box<dyn RenderBackend>>,
    active: usize,
}

impl RenderManager {
    /// `backends` must not be empty; the first one starts active.
    pub fn new(camera: Camera, backends: Vec<Box<dyn RenderBackend>>) -> Self {
        debug_assert!(!backends.is_empty());
        Self {
            camera,
            backends,
            active: 0,
        }
    }

    pub fn active_name(&self) -> &str {
        self.backends
            .get(self.active)
            .map(|b| b.name())
            .unwrap_or("none")
    }

    /// Switches to the next registered backend, wrapping around.
    pub fn toggle_backend(&mut self) {
        if self.backends.is_empty() {
            return;
        }
        self.active = (self.active + 1) % self.backends.len();
        info!("Switched to {} renderer", self.active_name());
    }

    /// Every backend keeps animating, active or not.
    pub fn update(&mut self, dt: f32) {
        for backend in &mut self.backends {
            backend.update(dt);
        }
    }

    pub fn render(&mut self) {
        if let Some(backend) = self.backends.get_mut(self.active) {
            backend.render(&self.camera);
        }
    }

    pub fn framebuffer(&self) -> Option<&FrameBuffer> {
        self.backends.get(self.active).map(|b| b.framebuffer())
    }

    /// Routes `command`; returns whether any backend acted on it.
    pub fn handle(&mut self, command: Command) -> bool {
        let handled = if command.is_shared() {
            self.backends
                .iter_mut()
                .fold(false, |acc, b| b.handle(command) | acc)
        } else {
            self.backends
                .get_mut(self.active)
                .is_some_and(|b| b.handle(command))
        };

        // Backends log the toggle itself at info.
        if handled {
            debug!("Applied '{}'", command);
        } else {
            warn!("'{}' is not supported by the {} renderer", command, self.active_name());
        }
        handled
    }
}
