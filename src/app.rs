use std::path::PathBuf;
use std::sync::Arc;

use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::color::Color;
use crate::error::InitError;
use crate::flat_pass::{DrawCommand, FlatPass};
use crate::geometry::RawGeometry;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh::{Mesh, MeshId};
use crate::shader::{ShaderPaths, ShaderProgram};

/// Window and device configuration for one demo.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub resizable: bool,
    /// Features the adapter must offer; startup fails with exit code 2 otherwise.
    pub required_features: wgpu::Features,
    /// Directory holding one sub-directory of shaders per demo.
    pub shader_root: PathBuf,
    /// Name of the sub-directory of `shader_root` this demo loads.
    pub shader_set: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 600,
            height: 600,
            vsync: true,
            resizable: true,
            required_features: wgpu::Features::empty(),
            shader_root: PathBuf::from("shaders"),
            shader_set: "default".to_string(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn require_features(mut self, features: wgpu::Features) -> Self {
        self.required_features |= features;
        self
    }

    pub fn shader_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.shader_root = root.into();
        self
    }

    pub fn shader_set(mut self, name: impl Into<String>) -> Self {
        self.shader_set = name.into();
        self
    }

    pub fn shader_paths(&self) -> ShaderPaths {
        ShaderPaths::for_demo(&self.shader_root, &self.shader_set)
    }
}

/// Context provided during app setup, after the device and shaders are ready.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
    meshes: &'a mut Vec<Mesh>,
}

impl SetupContext<'_> {
    /// Validates and uploads geometry, returning a handle for [`Frame::draw`].
    pub fn add_mesh(&mut self, geometry: &RawGeometry) -> Result<MeshId, InitError> {
        geometry.validate()?;

        let id = MeshId(self.meshes.len());
        let label = format!("Mesh {}", id.0);
        self.meshes.push(Mesh::new(self.gpu, geometry, &label));

        log::debug!(
            "uploaded mesh {}: {} vertices, {} triangles",
            id.0,
            geometry.vertices.len(),
            geometry.triangle_count()
        );
        Ok(id)
    }

    pub fn width(&self) -> u32 {
        self.gpu.width()
    }

    pub fn height(&self) -> u32 {
        self.gpu.height()
    }
}

/// Per-frame render settings and queued draws, kept across frames.
struct FrameState {
    draws: Vec<DrawCommand>,
    projection: Mat4,
    wireframe: bool,
    close_requested: bool,
    resized: Option<(u32, u32)>,
}

impl FrameState {
    /// Remembers the latest window size for the next frame, zero sizes included.
    fn record_resize(&mut self, width: u32, height: u32) {
        self.resized = Some((width, height));
    }
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            draws: Vec::new(),
            projection: Mat4::IDENTITY,
            wireframe: false,
            close_requested: false,
            resized: None,
        }
    }
}

/// Context handed to the frame closure.
///
/// Projection and wireframe persist until changed; draws are queued fresh every
/// frame and rendered in submission order over a black background.
pub struct Frame<'a> {
    pub input: &'a Input,
    /// Window size if it changed since the previous frame. Minimizing reports a
    /// zero dimension here even though the surface keeps its last size.
    pub resized: Option<(u32, u32)>,
    state: &'a mut FrameState,
}

impl Frame<'_> {
    pub fn draw(&mut self, mesh: MeshId, model_view: Mat4, color: Color) {
        self.state.draws.push(DrawCommand {
            mesh,
            model_view,
            color,
        });
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.state.projection = projection;
    }

    /// Draws subsequent frames as outlines; without line support the pass keeps filling.
    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.state.wireframe = wireframe;
    }

    /// Closes the window after this frame; nothing further is drawn.
    pub fn close(&mut self) {
        self.state.close_requested = true;
    }
}

/// Opens a window, loads the configured shader pair and runs until it closes.
///
/// `setup` runs once with the device ready and returns the per-frame closure.
/// Any initialization failure ends the event loop and is returned; a normal close
/// returns `Ok(())`.
pub fn run_with_config<S, F>(config: AppConfig, setup: S) -> Result<(), InitError>
where
    S: FnOnce(&mut SetupContext) -> Result<F, InitError> + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = OrreryApp {
        state: AppState::Pending {
            config,
            setup: Some(Box::new(move |ctx: &mut SetupContext| {
                let frame_fn = setup(ctx)?;
                Ok(Box::new(frame_fn) as Box<dyn FnMut(&mut Frame)>)
            })),
        },
        error: None,
    };

    event_loop.run_app(&mut app)?;

    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

type SetupFn = Box<dyn FnOnce(&mut SetupContext) -> Result<Box<dyn FnMut(&mut Frame)>, InitError>>;

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    pass: FlatPass,
    meshes: Vec<Mesh>,
    input: Input,
    frame_fn: Box<dyn FnMut(&mut Frame)>,
    frame: FrameState,
}

enum AppState {
    Pending {
        config: AppConfig,
        setup: Option<SetupFn>,
    },
    Running(Box<Running>),
    Finished,
}

struct OrreryApp {
    state: AppState,
    error: Option<InitError>,
}

impl OrreryApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: InitError) {
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.state = AppState::Finished;
        event_loop.exit();
    }
}

fn start(
    event_loop: &ActiveEventLoop,
    config: &AppConfig,
    setup: SetupFn,
) -> Result<Running, InitError> {
    let window_attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable);

    let window = Arc::new(event_loop.create_window(window_attrs)?);
    let gpu = GpuContext::new(window.clone(), config.required_features, config.vsync)?;

    let program = ShaderProgram::load(&gpu, &config.shader_paths())?;
    let pass = FlatPass::new(&gpu, &program)?;

    let mut meshes = Vec::new();
    let frame_fn = {
        let mut ctx = SetupContext {
            gpu: &gpu,
            meshes: &mut meshes,
        };
        setup(&mut ctx)?
    };

    log::info!("'{}' ready with {} meshes", config.title, meshes.len());

    Ok(Running {
        window,
        gpu,
        pass,
        meshes,
        input: Input::new(),
        frame_fn,
        frame: FrameState::default(),
    })
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending { config, setup } = &mut self.state else {
            return;
        };
        let Some(setup) = setup.take() else {
            return;
        };

        match start(event_loop, config, setup) {
            Ok(running) => {
                running.window.request_redraw();
                self.state = AppState::Running(Box::new(running));
            }
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(app) = &mut self.state else {
            return;
        };

        app.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if !app.gpu.resize(size.width, size.height) {
                    log::debug!("zero-sized window, surface left at its last size");
                }
                app.frame.record_resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if app.redraw() {
                    app.window.request_redraw();
                } else {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

impl Running {
    /// Runs the frame closure and renders its draws. Returns `false` once the
    /// frame asked to close.
    fn redraw(&mut self) -> bool {
        self.frame.draws.clear();
        let resized = self.frame.resized.take();

        let mut frame = Frame {
            input: &self.input,
            resized,
            state: &mut self.frame,
        };
        (self.frame_fn)(&mut frame);

        self.input.begin_frame();

        if self.frame.close_requested {
            log::info!("close requested");
            return false;
        }

        self.render();
        true
    }

    fn render(&mut self) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring the next frame");
                return;
            }
            Err(error) => {
                log::warn!("skipping frame: {error}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.pass.render(
            &self.gpu,
            &mut encoder,
            &view,
            Color::BLACK,
            self.frame.projection,
            self.frame.wireframe,
            &self.meshes,
            &self.frame.draws,
        );

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
