//! egui overlay rendered on top of the game scene: the outcome banner and the
//! F3 debug panel.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The banner is drawn whenever one is passed in; the panel only when `visible`.

use dd_core::time::TimeState;
use winit::window::Window;

use crate::banner::{self, Banner};

const BANNER_FONT_SIZE: f32 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    /// Player vertical velocity in pixels per second
    pub player_velocity: f32,
    /// Delta time fed to the last simulation tick
    pub delta_time: f32,
    /// Player animation frame interval
    pub update_time: f32,
    /// Player animation accumulator
    pub running_time: f32,
    pub player_frame: u32,
    pub airborne: bool,
    pub draw_calls: u32,
    pub sprite_count: u32,
    /// "Playing", "Won" or "Lost"
    pub outcome_label: String,
    pub music_volume: f32,
    pub music_paused: bool,
    pub music_active: bool,
    /// Times the track has started, counting the first play
    pub music_plays: u32,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        banner: Option<Banner>,
        stats: &OverlayStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let visible = self.visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(banner) = banner {
                banner::show(ctx, banner, BANNER_FONT_SIZE);
            }
            if !visible {
                return;
            }
            egui::Window::new("Debug")
                .default_pos([10.0, 10.0])
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                    ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                    ui.label(format!("Frame: {}", time.frame_count));
                    ui.separator();
                    ui.label(format!("Velocity: {:.0}", stats.player_velocity));
                    ui.label(format!("DeltaTime: {:.4}", stats.delta_time));
                    ui.label(format!("UpdateTime: {:.4}", stats.update_time));
                    ui.label(format!("RunningTime: {:.4}", stats.running_time));
                    ui.label(format!(
                        "Player frame: {}{}",
                        stats.player_frame,
                        if stats.airborne { " (airborne)" } else { "" }
                    ));
                    ui.label(format!("Outcome: {}", stats.outcome_label));
                    ui.separator();
                    ui.label(format!("Draw calls: {}", stats.draw_calls));
                    ui.label(format!("Sprites: {}", stats.sprite_count));
                    ui.separator();
                    if stats.music_active {
                        ui.label(format!(
                            "Music: {:.1}{} (play {})",
                            stats.music_volume,
                            if stats.music_paused { " \u{23f8}" } else { "" },
                            stats.music_plays
                        ));
                    } else {
                        ui.label("Music: off");
                    }
                });
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
