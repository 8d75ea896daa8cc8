//! Initialization errors and their process exit codes.
//!
//! Every failure the demos can hit happens while bringing the window, the GPU
//! device, the shaders, or the static geometry up. None of them is recoverable, so
//! the library reports them as [`InitError`] and lets the binary turn them into an
//! exit status via [`InitError::exit_code`]:
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Window closed normally                                   |
//! | 1    | Windowing, surface, adapter or device initialization     |
//! | 2    | The adapter lacks a feature the demo requires            |
//! | 3    | Shader load, compilation or pipeline link failure        |

use std::path::PathBuf;

use crate::geometry::GeometryError;

/// Errors raised while loading and building a vertex/fragment shader pair.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile shader '{}': {message}", path.display())]
    Compile { path: PathBuf, message: String },

    #[error("failed to link shader program: {message}")]
    Link { message: String },
}

/// Errors that abort demo startup.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("device creation failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no usable format or alpha mode for this adapter")]
    IncompatibleSurface,

    #[error("adapter does not support required features: {missing}")]
    Unsupported { missing: wgpu::Features },

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
}

impl InitError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            InitError::Unsupported { .. } => 2,
            InitError::Shader(_) => 3,
            InitError::EventLoop(_)
            | InitError::Window(_)
            | InitError::Surface(_)
            | InitError::IncompatibleSurface
            | InitError::Adapter(_)
            | InitError::Device(_)
            | InitError::Geometry(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_failures_exit_with_three() {
        let compile = InitError::from(ShaderError::Compile {
            path: PathBuf::from("shaders/spheres/vertex.wgsl"),
            message: "expected ';'".into(),
        });
        let link = InitError::from(ShaderError::Link {
            message: "location 0 not provided".into(),
        });
        let io = InitError::from(ShaderError::Io {
            path: PathBuf::from("missing.wgsl"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });

        assert_eq!(compile.exit_code(), 3);
        assert_eq!(link.exit_code(), 3);
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn missing_features_exit_with_two() {
        let err = InitError::Unsupported {
            missing: wgpu::Features::POLYGON_MODE_LINE,
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("POLYGON_MODE_LINE"));
    }

    #[test]
    fn geometry_failures_exit_with_one() {
        let err = InitError::from(GeometryError::Empty);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn shader_error_names_the_file() {
        let err = ShaderError::Compile {
            path: PathBuf::from("shaders/grid/fragment.wgsl"),
            message: "unknown identifier".into(),
        };
        let text = err.to_string();
        assert!(text.contains("shaders/grid/fragment.wgsl"));
        assert!(text.contains("unknown identifier"));
    }
}
