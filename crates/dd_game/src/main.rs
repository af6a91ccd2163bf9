//! Dapper Dasher: main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. Each
//! `RedrawRequested` runs exactly one simulation tick with the measured frame
//! delta (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure and cap the wall-clock delta
//!   2. poll the config file and re-apply tunables if it changed
//!   3. `World::tick` -- animation, jump physics, parallax, obstacles, collision
//!   4. music controls and loop re-queue
//!   5. rebuild the sprite mesh, draw it, then composite the egui overlay
//!
//! `about_to_wait` sleeps until the next frame deadline for `target_fps`.

mod assets;
mod collision;
mod config;
mod controller;
mod mesh;
mod parallax;
#[cfg(test)]
mod replay;
mod world;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::TextureSet;
use config::{load_config_from_path, load_config_or_default, ConfigWatcher, GameConfig};
use controller::ControllerInput;
use dd_audio::MusicPlayer;
use dd_core::input::{InputState, Key};
use dd_core::time::TimeState;
use dd_overlay::{Banner, DebugOverlay, OverlayStats};
use dd_platform::PlatformConfig;
use dd_render::{Camera2D, GpuContext, SpritePipeline, SpriteVertex};
use mesh::{build_frame_mesh, DrawCall, TextureSizes};
use world::{Outcome, World};

const CONFIG_PATH: &str = "config/dapper_dasher.json";
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// All mutable game state lives here. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface are available.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,

    config_watcher: ConfigWatcher,
    world: World,
    textures: TextureSet,
    texture_sizes: TextureSizes,
    music: MusicPlayer,
    last_dt: f32,

    // The sprite mesh is rebuilt on the CPU each frame, then streamed into
    // these GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    sprite_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &GameConfig, config_path: PathBuf) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone(), config.window.vsync)?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let textures = TextureSet::load(&gpu.device, &gpu.queue, &sprite_pipeline, config);
        if textures.placeholder_count() > 0 {
            log::warn!(
                "{} texture(s) missing; placeholders in use",
                textures.placeholder_count()
            );
        }
        let texture_sizes = textures.sizes();
        let world = World::new(config, &texture_sizes.sheet_sizes())?;

        let music = if config.audio.enabled {
            MusicPlayer::start(Path::new(&config.audio.music), config.audio.initial_volume)
        } else {
            log::info!("Music disabled by config");
            MusicPlayer::silent(config.audio.initial_volume)
        };

        // The camera covers the logical game area; the surface stretches it.
        let camera = Camera2D::new(config.window.width, config.window.height);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time: TimeState::new(config.window.target_fps),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            debug_overlay,
            config_watcher: ConfigWatcher::new(config_path),
            world,
            textures,
            texture_sizes,
            music,
            last_dt: 0.0,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
            sprite_count: 0,
        };
        state.rebuild_mesh();
        Ok(state)
    }

    fn poll_config_reload(&mut self) {
        if !self.config_watcher.should_reload() {
            return;
        }
        match load_config_from_path(self.config_watcher.path()) {
            Ok(config) => {
                self.world.retune(&config);
                log::info!(
                    "Config reloaded: {}",
                    self.config_watcher.path().display()
                );
            }
            Err(err) => {
                log::error!("Config reload failed: {err}");
            }
        }
    }

    fn update_music(&mut self) {
        if self.input.is_just_pressed(Key::P) {
            self.music.toggle_pause();
        }
        if self.input.is_just_pressed(Key::Up) {
            self.music.volume_up();
        }
        if self.input.is_just_pressed(Key::Down) {
            self.music.volume_down();
        }
        self.music.update();
    }

    fn rebuild_mesh(&mut self) {
        let mesh = build_frame_mesh(&self.world, &self.texture_sizes);
        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        if !mesh.vertices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&mesh.vertices),
            );
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.sprite_count = mesh.sprite_count();
        self.draw_calls = mesh.draw_calls;
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn overlay_stats(&self, outcome: Outcome) -> OverlayStats {
        let controls = self.music.controls();
        OverlayStats {
            player_velocity: self.world.controller.velocity_y,
            delta_time: self.last_dt,
            update_time: self.world.player.frame_interval,
            running_time: self.world.player.elapsed_since_frame,
            player_frame: self.world.player.current_frame,
            airborne: !self.world.controller.is_grounded(),
            draw_calls: self.draw_calls.len() as u32,
            sprite_count: self.sprite_count as u32,
            outcome_label: outcome.label().to_string(),
            music_volume: controls.volume(),
            music_paused: controls.is_paused(),
            music_active: self.music.is_active(),
            music_plays: self.music.plays(),
        }
    }

    fn render(&mut self, outcome: Outcome) {
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let banner = match outcome {
            Outcome::Playing => None,
            Outcome::Won => Some(Banner::Win),
            Outcome::Lost => Some(Banner::GameOver),
        };
        let stats = self.overlay_stats(outcome);
        let (egui_primitives, egui_textures_delta) =
            self.debug_overlay
                .prepare(&self.window, &self.time, banner, &stats);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.draw_calls {
                render_pass.set_bind_group(1, self.textures.bind_group(draw.texture), &[]);
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: GameConfig,
    config_path: PathBuf,
    state: Option<EngineState>,
}

impl App {
    fn new(config_path: PathBuf) -> Self {
        let config = load_config_or_default(&config_path);
        Self {
            config,
            config_path,
            state: None,
        }
    }

    fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.config.window.title.clone(),
            width: self.config.window.width,
            height: self.config.window.height,
            resizable: false,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = self.platform_config();
        let window = match dd_platform::create_window(event_loop, &platform) {
            Ok(window) => window,
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
                return;
            }
        };
        log::info!("Window created: {}x{}", platform.width, platform.height);

        match EngineState::new(window, &self.config, self.config_path.clone()) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Startup failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        match state.time.next_deadline() {
            Some(deadline) if Instant::now() < deadline => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Poll);
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                let dt = state.time.begin_frame();
                state.last_dt = dt;

                if state.input.is_just_pressed(Key::Escape) {
                    log::info!("Escape pressed, exiting.");
                    event_loop.exit();
                    return;
                }
                if state.input.is_just_pressed(Key::F3) {
                    state.debug_overlay.toggle();
                }

                state.poll_config_reload();

                let outcome = state.world.tick(
                    ControllerInput {
                        jump_pressed: state.input.is_just_pressed(Key::Space),
                    },
                    dt,
                );
                log::trace!(
                    "tick dt={dt:.4} y={:.1} vy={:.1} outcome={}",
                    state.world.player.position.y,
                    state.world.controller.velocity_y,
                    outcome.label()
                );

                state.update_music();
                state.rebuild_mesh();
                state.render(outcome);

                state.input.end_frame();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Dapper Dasher starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(PathBuf::from(CONFIG_PATH));
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::KeyP), Some(Key::P));
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::ArrowDown), Some(Key::Down));
        assert_eq!(map_key(KeyCode::F3), Some(Key::F3));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::KeyW), None);
        assert_eq!(map_key(KeyCode::ArrowLeft), None);
    }
}
