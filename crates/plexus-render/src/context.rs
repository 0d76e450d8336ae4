//! wgpu window surface setup

use std::sync::Arc;
use thiserror::Error;
use winit::window::Window;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),
    #[error("Failed to get adapter")]
    AdapterNotFound,
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),
    #[error("Surface error: {0}")]
    SurfaceError(String),
    #[error("Frame buffer is {actual} bytes, expected {expected}")]
    FrameSizeMismatch { expected: usize, actual: usize },
}

/// Device, queue and the configured window surface
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        // The blit pass is the only GPU work; any low-power adapter will do
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterNotFound)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Plexus Device"),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| RenderError::DeviceCreation(e.to_string()))?;

        let size = window.inner_size();
        let config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .map(|mut config| {
                let caps = surface.get_capabilities(&adapter);
                if let Some(srgb) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
                    config.format = srgb;
                }
                config
            })
            .ok_or_else(|| RenderError::SurfaceCreation("surface unsupported by adapter".into()))?;
        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::info!(
            "[render] {} via {:?}, surface {:?} {}x{}",
            info.name,
            info.backend,
            config.format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Texture format of the window surface
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Reconfigure for a new window size. Zero-sized (minimized) windows
    /// are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Reconfigure at the current size after a lost or outdated surface
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}
