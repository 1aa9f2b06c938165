use crate::{
    host::ViewerHost,
    renderer::{context::AdapterCapabilities, context::NoContext, Renderer},
    settings::ViewerArgs,
    ui::{self, HudStats},
};
use anyhow::Result;
use hero_field::{
    CapabilitySource, ContextEvent, FrameOutput, FrameTick, HeroShell, PointerState, ShellState,
};
use std::{sync::Arc, time::Instant};
use winit::{event::WindowEvent, window::Window};

/// What the event loop does with a failed `get_current_texture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRecovery {
    /// Rebuild the swap chain; the scene is untouched.
    Reconfigure,
    /// Lose the context, rebuild the swap chain, restore a fresh scene.
    Cycle,
    Exit,
    Skip,
}

/// `Outdated` only needs a reconfigure. `Lost` cycles the context when a
/// scene is live; a context already lost by the user stays lost.
pub fn surface_recovery(err: &wgpu::SurfaceError, state: ShellState) -> SurfaceRecovery {
    match (err, state) {
        (wgpu::SurfaceError::Outdated, _) => SurfaceRecovery::Reconfigure,
        (wgpu::SurfaceError::Lost, ShellState::Supported) => SurfaceRecovery::Cycle,
        (wgpu::SurfaceError::Lost, _) => SurfaceRecovery::Reconfigure,
        (wgpu::SurfaceError::OutOfMemory, _) => SurfaceRecovery::Exit,
        _ => SurfaceRecovery::Skip,
    }
}

pub struct App {
    pub renderer: Renderer,
    pub shell: HeroShell<ViewerHost>,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    caps: AdapterCapabilities,
    force_backdrop: bool,
    pointer: PointerState,
    started: Instant,
    last_frame: Instant,
}

impl App {
    pub async fn new(window: Arc<Window>, args: &ViewerArgs) -> Result<Self> {
        let config = args.hero_config()?;
        let mut renderer = Renderer::new(window.clone()).await?;
        let caps = renderer.gfx.capabilities();

        let source: &dyn CapabilitySource = if args.no_3d { &NoContext } else { &caps };
        let shell = HeroShell::mount(ViewerHost::new(), config, source);
        if let Some(profile) = shell.profile() {
            renderer.set_antialiasing(profile.antialiasing);
        }

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        let now = Instant::now();
        Ok(Self {
            renderer,
            shell,
            egui_ctx,
            egui_state,
            caps,
            force_backdrop: args.no_3d,
            pointer: PointerState::CENTER,
            started: now,
            last_frame: now,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);

        match event {
            WindowEvent::CursorMoved { position, .. } if self.shell.host().tracks_pointer() => {
                let size = self.renderer.gfx.size;
                self.pointer = PointerState::new(
                    position.x as f32 / size.width.max(1) as f32,
                    position.y as f32 / size.height.max(1) as f32,
                );
            }
            WindowEvent::CursorLeft { .. } => self.pointer = PointerState::CENTER,
            WindowEvent::Resized(physical_size) => self.resize(*physical_size),
            _ => {}
        }

        response.consumed
    }

    /// Drops the scene and asks the shell to recover it.
    pub fn lose_context(&mut self) {
        let mut event = ContextEvent::new();
        self.shell.handle_context_lost(&mut event);
    }

    pub fn restore_context(&mut self) {
        let source: &dyn CapabilitySource = if self.force_backdrop {
            &NoContext
        } else {
            &self.caps
        };
        self.shell.handle_context_restored(source);
        if let Some(profile) = self.shell.profile() {
            self.renderer.set_antialiasing(profile.antialiasing);
        }
    }

    /// Handles a failed frame acquisition. Returns `false` when the viewer should exit.
    pub fn recover_surface(&mut self, err: wgpu::SurfaceError) -> bool {
        match surface_recovery(&err, self.shell.state()) {
            SurfaceRecovery::Reconfigure => {
                log::debug!("Surface {:?}; reconfiguring", err);
                self.renderer.gfx.reconfigure();
            }
            SurfaceRecovery::Cycle => {
                log::warn!("Surface lost; cycling the context");
                self.lose_context();
                self.renderer.gfx.reconfigure();
                self.restore_context();
            }
            SurfaceRecovery::Exit => {
                log::error!("WGPU out of memory – exiting.");
                return false;
            }
            SurfaceRecovery::Skip => log::warn!("Render error: {:?}", err),
        }
        true
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let now = Instant::now();
        let tick = FrameTick {
            now_ms: now.duration_since(self.started).as_secs_f64() * 1000.0,
            delta_s: now.duration_since(self.last_frame).as_secs_f32(),
        };
        self.last_frame = now;

        let generation = self.shell.generation();
        let (background, draw_scene) = match self.shell.tick(tick, self.pointer) {
            FrameOutput::Scene(scene) => {
                self.renderer.prepare_scene(scene, generation);
                (scene.config().theme.background(), true)
            }
            FrameOutput::Backdrop(backdrop) => (backdrop.background, false),
        };

        self.renderer.render(&swap_view, background, draw_scene);

        let stats = HudStats::from_shell(&self.shell);
        let (theme, interactive) = {
            let config = self.shell.config();
            (config.theme, config.interactive)
        };
        let state = self.shell.state();

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        if !draw_scene {
            let t = (tick.now_ms / 1000.0) as f32;
            ui::paint_backdrop(&self.egui_ctx, self.shell.backdrop(), t);
        }
        ui::draw_hud(&self.egui_ctx, &stats);
        let actions = ui::draw_controls(&self.egui_ctx, theme, interactive, state);

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        self.apply(actions);
        Ok(())
    }

    fn apply(&mut self, actions: ui::UiActions) {
        if let Some(theme) = actions.theme {
            log::info!("Theme -> {}", theme);
            self.shell.set_theme(theme);
        }
        if let Some(interactive) = actions.interactive {
            self.shell.set_interactive(interactive);
        }
        if actions.lose_context {
            self.lose_context();
        }
        if actions.restore_context && self.shell.state() == ShellState::ContextLost {
            self.restore_context();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outdated_surface_keeps_the_scene() {
        for state in [ShellState::Supported, ShellState::ContextLost, ShellState::Unsupported] {
            assert_eq!(
                surface_recovery(&wgpu::SurfaceError::Outdated, state),
                SurfaceRecovery::Reconfigure
            );
        }
    }

    #[test]
    fn lost_surface_cycles_only_a_live_scene() {
        let lost = wgpu::SurfaceError::Lost;
        assert_eq!(surface_recovery(&lost, ShellState::Supported), SurfaceRecovery::Cycle);
        // A context the user dropped is not brought back by a surface loss.
        assert_eq!(
            surface_recovery(&lost, ShellState::ContextLost),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            surface_recovery(&lost, ShellState::Unsupported),
            SurfaceRecovery::Reconfigure
        );
    }

    #[test]
    fn out_of_memory_exits_and_timeouts_skip() {
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::OutOfMemory, ShellState::Supported),
            SurfaceRecovery::Exit
        );
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::Timeout, ShellState::Supported),
            SurfaceRecovery::Skip
        );
    }
}
