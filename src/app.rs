use crate::error::Result;
use crate::io::config::Config;
use crate::io::image::save_framebuffer_to_image;
use crate::pipeline::backend::{Command, RenderBackend, RenderManager};
use crate::pipeline::renderer::{RenderSettings, SoftwareRenderer};
use crate::scene::context::RenderContext;
use crate::scene::loader::init_scene_resources;
use crate::ui::input::CameraController;
use log::{info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::path::Path;
use std::time::Instant;

/// Fixed timestep used to advance animation in headless mode.
const HEADLESS_DT: f32 = 1.0 / 60.0;

/// Loads the scene and registers every available backend.
pub fn build_manager(config: &Config) -> Result<RenderManager> {
    let RenderContext { camera, scene } = init_scene_resources(config);
    let software = SoftwareRenderer::new(
        config.render.width,
        config.render.height,
        scene,
        RenderSettings::from(&config.render),
    )?;
    let backends: Vec<Box<dyn RenderBackend>> = vec![Box::new(software)];
    Ok(RenderManager::new(camera, backends))
}

/// Renders `frames` frames without a window and writes the last one to `output`.
pub fn run_cli(config: &Config, frames: usize, output: &Path) -> Result<()> {
    info!("Starting CLI mode ({} frames)...", frames);
    let mut manager = build_manager(config)?;
    let start_time = Instant::now();

    for frame in 0..frames.max(1) {
        if frame > 0 {
            manager.update(HEADLESS_DT);
        }
        manager.render();
    }

    info!("Render completed in {:.2?}", start_time.elapsed());

    if let Some(fb) = manager.framebuffer() {
        save_framebuffer_to_image(fb, output)?;
    }
    info!("Done.");
    Ok(())
}

/// Runs the interactive window until it is closed or Escape is pressed.
pub fn run_gui(config: &Config) -> Result<()> {
    let width = config.render.width;
    let height = config.render.height;

    info!("Starting GUI mode ({}x{})...", width, height);
    info!("Controls: WASD=Move, Space/LeftShift=Up/Down, RightDrag=Look, Scroll=FOV");
    info!("F1=Backend, F5=Rotation, F6=Normal map, F7=Render state, F10=Uniform color, X=Screenshot");

    let mut manager = build_manager(config)?;
    let mut window = Window::new(
        "Software Rasterizer",
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    let mut controller = CameraController::new(config.camera.speed, config.camera.sensitivity);
    let mut last_frame_time = Instant::now();
    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        // --- Input ---
        controller.update(&window, &mut manager.camera, dt);
        handle_keys(&window, &mut manager);

        // --- Update & Render ---
        manager.update(dt);
        manager.render();

        // --- Display ---
        if let Some(fb) = manager.framebuffer() {
            window.update_with_buffer(fb.color_buffer(), fb.width, fb.height)?;
            if window.is_key_pressed(Key::X, KeyRepeat::No) {
                let name = screenshot_name();
                match save_framebuffer_to_image(fb, &name) {
                    Ok(()) => info!("Screenshot saved to '{}'", name),
                    Err(e) => warn!("Failed to save screenshot: {}", e),
                }
            }
        }

        frame_count += 1;
        if last_fps_update.elapsed().as_secs_f32() >= 2.0 {
            let fps = frame_count as f32 / last_fps_update.elapsed().as_secs_f32();
            window.set_title(&format!(
                "Software Rasterizer - {} - {:.1} FPS - FOV: {:.1}",
                manager.active_name(),
                fps,
                manager.camera.fov()
            ));
            info!("Average FPS: {:.1}", fps);
            frame_count = 0;
            last_fps_update = Instant::now();
        }
    }

    Ok(())
}

fn handle_keys(window: &Window, manager: &mut RenderManager) {
    if window.is_key_pressed(Key::F1, KeyRepeat::No) {
        manager.toggle_backend();
    }

    let bindings = [
        (Key::F5, Command::ToggleRotation),
        (Key::F6, Command::ToggleNormalMap),
        (Key::F7, Command::CycleRenderState),
        (Key::F10, Command::ToggleUniformColor),
    ];
    for (key, command) in bindings {
        if window.is_key_pressed(key, KeyRepeat::No) {
            manager.handle(command);
        }
    }
}

fn screenshot_name() -> String {
    format!("screenshot_{}.png", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}
