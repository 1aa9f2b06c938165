use anyhow::{anyhow, Result};
use hero_field::{CapabilitySource, ProbeError, RenderCapabilities};
use std::sync::Arc;
use winit::window::Window;

/// Holds all GPU resources needed for rendering.
pub struct GfxContext {
    pub surface: wgpu::Surface<'static>,
    pub adapter: wgpu::Adapter,
    pub device:  wgpu::Device,
    pub queue:   wgpu::Queue,
    pub config:  wgpu::SurfaceConfiguration,
    pub size:    winit::dpi::PhysicalSize<u32>,
}

impl GfxContext {
    /// Creates a new graphics context bound to the given window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        // The surface must outlive the window; `Arc` guarantees this.
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference:         wgpu::PowerPreference::HighPerformance,
                compatible_surface:       Some(&surface),
                force_fallback_adapter:   false,
            })
            .await
            .ok_or_else(|| anyhow!("Failed to find a suitable GPU adapter."))?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label:             Some("Hero Device"),
                    required_features: wgpu::Features::empty(),
                    // Downlevel limits so GL-only machines still get a scene.
                    required_limits:   wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        // Prefer an sRGB surface; palette colours are converted to linear on upload.
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats."))?;

        let config = wgpu::SurfaceConfiguration {
            usage:                       wgpu::TextureUsages::RENDER_ATTACHMENT,
            format:                      surface_format,
            width:                       size.width.max(1),
            height:                      size.height.max(1),
            present_mode:                wgpu::PresentMode::Fifo,
            alpha_mode:                  caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats:                vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            config,
            size,
        })
    }

    /// Resizes the swap chain when the window size changes.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reapplies the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Whether both the surface format and the depth format accept `samples`.
    pub fn supports_msaa(&self, samples: u32, depth_fmt: wgpu::TextureFormat) -> bool {
        [self.config.format, depth_fmt].iter().all(|&fmt| {
            self.adapter
                .get_texture_format_features(fmt)
                .flags
                .sample_count_supported(samples)
        })
    }

    pub fn capabilities(&self) -> AdapterCapabilities {
        AdapterCapabilities::from_adapter(&self.adapter)
    }
}

/// What the adapter reported at startup, in the shape the device probe expects.
#[derive(Debug, Clone)]
pub struct AdapterCapabilities {
    caps: RenderCapabilities,
    user_agent: String,
}

impl AdapterCapabilities {
    pub fn from_adapter(adapter: &wgpu::Adapter) -> Self {
        let info = adapter.get_info();
        let modern = match info.backend {
            wgpu::Backend::Vulkan
            | wgpu::Backend::Metal
            | wgpu::Backend::Dx12
            | wgpu::Backend::BrowserWebGpu => true,
            wgpu::Backend::Gl => adapter.get_downlevel_capabilities().is_webgpu_compliant(),
            _ => false,
        };
        let float_textures = adapter
            .get_texture_format_features(wgpu::TextureFormat::Rgba16Float)
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT);

        Self {
            caps: RenderCapabilities {
                api_version: if modern { 2 } else { 1 },
                max_texture_size: adapter.limits().max_texture_dimension_2d,
                float_textures,
                // Instancing is part of core wgpu.
                instanced_arrays: true,
            },
            user_agent: synthesize_user_agent(std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

impl CapabilitySource for AdapterCapabilities {
    fn user_agent(&self) -> Option<String> {
        Some(self.user_agent.clone())
    }

    fn query(&self) -> Result<RenderCapabilities, ProbeError> {
        Ok(self.caps)
    }
}

/// Capability source for `--no-3d`: behaves like a host with no 3D context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl CapabilitySource for NoContext {
    fn user_agent(&self) -> Option<String> {
        Some(synthesize_user_agent(std::env::consts::OS, std::env::consts::ARCH))
    }

    fn query(&self) -> Result<RenderCapabilities, ProbeError> {
        Err(ProbeError::NoAdapter)
    }
}

/// Platform string in browser form so device classification sees the OS.
fn synthesize_user_agent(os: &str, arch: &str) -> String {
    let platform = match os {
        "ios" => "iPhone; CPU iPhone OS like Mac OS X",
        "android" => "Linux; Android; Mobile",
        "macos" => "Macintosh; Intel Mac OS X",
        "windows" => "Windows NT 10.0; Win64",
        _ => "X11; Linux",
    };
    format!("Mozilla/5.0 ({platform}; {arch}) hero_viewer/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_field::{probe, DeviceClass};

    #[test]
    fn user_agent_classifies_like_the_platform() {
        let ua = synthesize_user_agent("android", "aarch64");
        let class = DeviceClass::from_user_agent(Some(&ua));
        assert!(class.is_android && class.is_mobile);

        let ua = synthesize_user_agent("linux", "x86_64");
        let class = DeviceClass::from_user_agent(Some(&ua));
        assert!(!class.is_mobile && !class.is_tablet);
    }

    #[test]
    fn no_context_source_probes_as_unsupported() {
        assert!(!probe(&NoContext).has_context());
    }
}
