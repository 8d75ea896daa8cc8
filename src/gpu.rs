//! Core GPU context and device management.
//!
//! [`GpuContext`] holds the wgpu objects every pass needs: the surface presenting to
//! the window, the device, the queue and the current surface configuration. It is
//! created once when the window comes up and lives until the app exits; dropping it
//! releases the device and everything created from it.

use std::sync::Arc;

use winit::window::Window;

use crate::error::InitError;

/// Core GPU context holding wgpu resources.
pub struct GpuContext {
    /// The surface for presenting rendered frames to the window.
    pub surface: wgpu::Surface<'static>,
    /// The logical GPU device for creating resources and pipelines.
    pub device: wgpu::Device,
    /// The command queue for submitting work to the GPU.
    pub queue: wgpu::Queue,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Create a new GPU context from a winit window.
    ///
    /// This performs all wgpu initialization:
    /// 1. Creates a wgpu instance with the primary backends
    /// 2. Creates a surface for the window
    /// 3. Requests an adapter compatible with the surface
    /// 4. Checks the adapter offers `required_features`
    /// 5. Creates the logical device and command queue
    /// 6. Configures the surface with an sRGB format; `vsync` picks Fifo presentation
    pub fn new(
        window: Arc<Window>,
        required_features: wgpu::Features,
        vsync: bool,
    ) -> Result<Self, InitError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let info = adapter.get_info();
        log::info!(
            "GPU adapter: {} ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );
        log::info!("driver: {} {}", info.driver, info.driver_info);

        let missing = required_features.difference(adapter.features());
        if !missing.is_empty() {
            return Err(InitError::Unsupported { missing });
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Orrery Device"),
            required_features,
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
            experimental_features: Default::default(),
        }))?;

        device.on_uncaptured_error(Arc::new(|error| {
            log::error!("uncaptured GPU error: {error}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let (surface_format, alpha_mode) =
            choose_surface_format(&surface_caps.formats, &surface_caps.alpha_modes)?;

        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "surface: {}x{} {:?}, {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Resize the surface to new dimensions.
    ///
    /// Returns `false` and leaves the surface alone for zero-sized dimensions
    /// (which occur while the window is minimized).
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    /// Reapplies the current configuration after the surface was lost or outdated.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }
}

/// Picks an sRGB format if the surface offers one, else its first format, plus the
/// first supported alpha mode.
fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    alpha_modes: &[wgpu::CompositeAlphaMode],
) -> Result<(wgpu::TextureFormat, wgpu::CompositeAlphaMode), InitError> {
    let format = formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
        .ok_or(InitError::IncompatibleSurface)?;
    let alpha_mode = alpha_modes
        .first()
        .copied()
        .ok_or(InitError::IncompatibleSurface)?;
    Ok((format, alpha_mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn prefers_srgb_format() {
        let (format, alpha) = choose_surface_format(
            &[TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb],
            &[CompositeAlphaMode::Opaque],
        )
        .expect("surface is usable");
        assert_eq!(format, TextureFormat::Bgra8UnormSrgb);
        assert_eq!(alpha, CompositeAlphaMode::Opaque);
    }

    #[test]
    fn falls_back_to_first_format() {
        let (format, _) =
            choose_surface_format(&[TextureFormat::Rgba16Float], &[CompositeAlphaMode::Auto])
                .expect("surface is usable");
        assert_eq!(format, TextureFormat::Rgba16Float);
    }

    #[test]
    fn empty_capabilities_are_an_init_error() {
        let err = choose_surface_format(&[], &[CompositeAlphaMode::Opaque]).unwrap_err();
        assert!(matches!(err, InitError::IncompatibleSurface));
        assert_eq!(err.exit_code(), 1);

        let err = choose_surface_format(&[TextureFormat::Bgra8UnormSrgb], &[]).unwrap_err();
        assert!(matches!(err, InitError::IncompatibleSurface));
    }
}
