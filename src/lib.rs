//! # Orrery
//!
//! Two small real-time rendering demos on `wgpu` and `winit`:
//!
//! - **Zadanie 2** ([`demos::grid`]): a static 5×5 grid of green squares, each
//!   surrounded by four red triangles.
//! - **Zadanie 3** ([`demos::spheres`]): three nested spheres orbiting each other,
//!   with adjustable pitch, field of view and a wireframe toggle.
//!
//! The interesting parts are plain CPU code and usable on their own: the
//! procedural [`SphereParams`] mesh generator, the parent-relative
//! [`BodyChain`] transform update and the [`GridLayout`] instancing.
//!
//! ```no_run
//! use orrery::demos::spheres;
//!
//! fn main() {
//!     if let Err(e) = spheres::run(spheres::config()) {
//!         std::process::exit(e.exit_code());
//!     }
//! }
//! ```

mod app;
mod camera;
mod cli;
mod color;
pub mod demos;
mod error;
mod flat_pass;
mod geometry;
mod gpu;
mod grid;
mod input;
mod logging;
mod mesh;
mod shader;
mod sphere;
mod transform;

pub use app::{AppConfig, Frame, SetupContext, run_with_config};
pub use camera::{Camera, MAX_FOVY_DEGREES, MIN_FOVY_DEGREES, ZOOM_FACTOR};
pub use cli::Args;
pub use color::Color;
pub use error::{InitError, ShaderError};
pub use flat_pass::{DrawCommand, DrawUniforms, FlatPass, FrameUniforms};
pub use geometry::{GeometryError, RawGeometry};
pub use gpu::GpuContext;
pub use grid::GridLayout;
pub use input::Input;
pub use logging::{LoggingConfig, init_logging};
pub use mesh::{Mesh, MeshId, Vertex};
pub use shader::{FRAGMENT_ENTRY, ShaderPaths, ShaderProgram, ShaderSource, VERTEX_ENTRY};
pub use sphere::SphereParams;
pub use transform::{Body, BodyChain, ChainLink, wrap_degrees};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
