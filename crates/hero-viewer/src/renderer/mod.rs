//! The rendering orchestrator. Owns the GPU context, render targets,
//! the sprite pipeline and the egui renderer.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{context::GfxContext, pipelines::sprites::SpritePipeline, targets::Targets};
use crate::{
    camera::Camera,
    data::instances::{field_attribs, shape_attribs, shape_positions},
};
use glam::Vec3;
use hero_field::{HeroScene, Rgb};
use std::sync::Arc;
use winit::window::Window;

/// Samples used when the device profile allows antialiasing.
pub const MSAA_SAMPLES: u32 = 4;

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub sprites: SpritePipeline,
    pub egui_renderer: egui_wgpu::Renderer,
    /// (shell generation, field epoch) of the colours currently on the GPU.
    field_key: Option<(u64, u64)>,
    shape_scratch: Vec<Vec3>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let targets = Targets::new(&gfx.device, gfx.size, gfx.config.format, 1);
        let sprites = SpritePipeline::new(&gfx.device, targets.color_fmt, targets.depth_fmt, 1);
        let egui_renderer =
            egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            targets,
            sprites,
            egui_renderer,
            field_key: None,
            shape_scratch: Vec::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Switches MSAA on or off, rebuilding targets and pipeline when it changes.
    pub fn set_antialiasing(&mut self, enabled: bool) {
        let wanted = if enabled && self.gfx.supports_msaa(MSAA_SAMPLES, self.targets.depth_fmt) {
            MSAA_SAMPLES
        } else {
            1
        };
        if wanted == self.targets.sample_count {
            return;
        }
        log::info!("Scene sample count: {}", wanted);
        self.targets = Targets::new(
            &self.gfx.device,
            self.gfx.size,
            self.gfx.config.format,
            wanted,
        );
        self.sprites = SpritePipeline::new(
            &self.gfx.device,
            self.targets.color_fmt,
            self.targets.depth_fmt,
            wanted,
        );
        self.field_key = None;
    }

    /// Uploads this frame's scene state. `generation` tells restored scenes apart.
    pub fn prepare_scene(&mut self, scene: &HeroScene, generation: u64) {
        let device = &self.gfx.device;
        let queue = &self.gfx.queue;
        let (field_u, shapes_u) =
            Camera::scene_uniforms(scene, self.gfx.config.width, self.gfx.config.height);

        let field = scene.field();
        let layer = &mut self.sprites.field;
        layer.write_uniform(queue, &field_u);
        let grown = layer.write_positions(device, queue, field.display_positions());
        let key = (generation, scene.epoch());
        if grown || self.field_key != Some(key) {
            layer.write_attribs(device, queue, field_attribs(field));
            self.field_key = Some(key);
        }

        let geometry = scene.geometry();
        shape_positions(geometry, &mut self.shape_scratch);
        let layer = &mut self.sprites.shapes;
        layer.write_uniform(queue, &shapes_u);
        layer.write_positions(device, queue, &self.shape_scratch);
        layer.write_attribs(device, queue, shape_attribs(geometry));
    }

    /// Clears to `background` and, when `draw_scene` is set, draws the sprites.
    pub fn render(&mut self, swap_view: &wgpu::TextureView, background: Rgb, draw_scene: bool) {
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let [r, g, b] = crate::data::instances::srgb_to_linear(background);
        let (view, resolve_target) = match &self.targets.msaa {
            Some(msaa) => (msaa, Some(swap_view)),
            None => (swap_view, None),
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if draw_scene {
                self.sprites.draw(&mut pass);
            }
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
