//! Instanced camera-facing sprites for the particle field and floating shapes.

use crate::data::types::{SpriteAttrib, SpriteUniformStd140 as SpriteUniform};
use glam::Vec3;
use wgpu::util::DeviceExt;

const SPRITES_WGSL: &str = r#"
struct Sprites {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    model: mat4x4<f32>,
    opacity: f32,
};

@group(0) @binding(0) var<uniform> u: Sprites;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) position: vec3<f32>,
    @location(2) color: vec3<f32>,
    @location(3) size: f32,
) -> VsOut {
    // Expand in view space so the sprite always faces the camera.
    let center = u.view * u.model * vec4<f32>(position, 1.0);
    var out: VsOut;
    out.clip = u.proj * (center + vec4<f32>(corner * size, 0.0, 0.0));
    out.corner = corner;
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let r = length(in.corner);
    if (r > 1.0) {
        discard;
    }
    let alpha = u.opacity * (1.0 - smoothstep(0.55, 1.0, r));
    return vec4<f32>(in.color, alpha);
}
"#;

/// Elements allocated for a fresh layer; buffers grow by powers of two.
const INITIAL_CAPACITY: usize = 64;

/// One drawable set of sprites with its own uniform and instance buffers.
pub struct SpriteLayer {
    label: &'static str,
    uniform: wgpu::Buffer,
    bind: wgpu::BindGroup,
    positions: wgpu::Buffer,
    attribs: wgpu::Buffer,
    capacity: usize,
    len: u32,
    scratch: Vec<SpriteAttrib>,
}

impl SpriteLayer {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &'static str) -> Self {
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<SpriteUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });
        let (positions, attribs) = Self::instance_buffers(device, label, INITIAL_CAPACITY);
        Self {
            label,
            uniform,
            bind,
            positions,
            attribs,
            capacity: INITIAL_CAPACITY,
            len: 0,
            scratch: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    fn instance_buffers(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::Buffer) {
        let make = |stride: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (stride * capacity) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        (
            make(std::mem::size_of::<Vec3>()),
            make(std::mem::size_of::<SpriteAttrib>()),
        )
    }

    /// Grows the instance buffers. Returns true when they were recreated,
    /// in which case the static attributes must be written again.
    fn reserve(&mut self, device: &wgpu::Device, len: usize) -> bool {
        if len <= self.capacity {
            return false;
        }
        let capacity = len.next_power_of_two();
        log::debug!("Growing {} instance buffers to {}", self.label, capacity);
        let (positions, attribs) = Self::instance_buffers(device, self.label, capacity);
        self.positions = positions;
        self.attribs = attribs;
        self.capacity = capacity;
        true
    }

    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &SpriteUniform) {
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(uniform));
    }

    /// Per-frame positions. Returns true when static attributes were invalidated.
    pub fn write_positions(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        positions: &[Vec3],
    ) -> bool {
        let grown = self.reserve(device, positions.len());
        if !positions.is_empty() {
            queue.write_buffer(&self.positions, 0, bytemuck::cast_slice(positions));
        }
        self.len = positions.len() as u32;
        grown
    }

    pub fn write_attribs(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        attribs: impl ExactSizeIterator<Item = SpriteAttrib>,
    ) {
        self.reserve(device, attribs.len());
        self.scratch.clear();
        self.scratch.extend(attribs);
        if !self.scratch.is_empty() {
            queue.write_buffer(&self.attribs, 0, bytemuck::cast_slice(&self.scratch));
        }
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct SpritePipeline {
    pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    pub field: SpriteLayer,
    pub shapes: SpriteLayer,
}

impl SpritePipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite UBO Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<SpriteUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprites Shader"),
            source: wgpu::ShaderSource::Wgsl(SPRITES_WGSL.into()),
        });

        // Two triangles spanning [-1, 1]^2.
        let quad_corners: [[f32; 2]; 6] = [
            [-1.0, -1.0],
            [1.0, -1.0],
            [1.0, 1.0],
            [-1.0, -1.0],
            [1.0, 1.0],
            [-1.0, 1.0],
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Quad VB"),
            contents: bytemuck::cast_slice(&quad_corners),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let vbuf_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
            // Display positions, rewritten every frame.
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vec3>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 1,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            // Colour and size, written once per field generation.
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SpriteAttrib>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        shader_location: 2,
                        offset: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        shader_location: 3,
                        offset: 12,
                        format: wgpu::VertexFormat::Float32,
                    },
                ],
            },
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite PipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &vbuf_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_fmt,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_fmt,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
        });

        Self {
            field: SpriteLayer::new(device, &layout, "Field Sprites"),
            shapes: SpriteLayer::new(device, &layout, "Shape Sprites"),
            pipeline,
            quad_vb,
        }
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        // Shapes first; they sit behind most of the field.
        for layer in [&self.shapes, &self.field] {
            if layer.is_empty() {
                continue;
            }
            rpass.set_bind_group(0, &layer.bind, &[]);
            rpass.set_vertex_buffer(1, layer.positions.slice(..));
            rpass.set_vertex_buffer(2, layer.attribs.slice(..));
            rpass.draw(0..6, 0..layer.len);
        }
    }
}
