//! Loading and compiling a vertex/fragment shader pair from disk.
//!
//! Each demo reads two WGSL files at startup, `vertex.wgsl` and `fragment.wgsl`,
//! from its own directory under the shader root. Both are compiled inside a
//! validation error scope so a broken file surfaces as a [`ShaderError`] instead of
//! a panic from the default uncaptured-error handler.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShaderError;
use crate::gpu::GpuContext;

/// Entry point expected in `vertex.wgsl`.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point expected in `fragment.wgsl`.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL source text read from a file.
#[derive(Clone, Debug)]
pub struct ShaderSource {
    path: PathBuf,
    source: String,
}

impl ShaderSource {
    /// Read a shader from the given file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        let source = fs::read_to_string(&path).map_err(|source| ShaderError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compiles the source into a shader module, reporting validation failures.
    pub fn compile(&self, gpu: &GpuContext) -> Result<wgpu::ShaderModule, ShaderError> {
        log::debug!("compiling shader {}", self.path.display());

        let label = self.path.to_string_lossy();
        let module = capture_validation(gpu, || {
            gpu.device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(label.as_ref()),
                    source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
                })
        });

        module.map_err(|message| ShaderError::Compile {
            path: self.path.clone(),
            message,
        })
    }
}

/// Paths of a demo's shader pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    /// `<root>/<demo>/vertex.wgsl` and `<root>/<demo>/fragment.wgsl`.
    pub fn for_demo(root: impl AsRef<Path>, demo: &str) -> Self {
        let dir = root.as_ref().join(demo);
        Self {
            vertex: dir.join("vertex.wgsl"),
            fragment: dir.join("fragment.wgsl"),
        }
    }
}

/// A compiled vertex/fragment module pair, not yet linked into a pipeline.
#[derive(Debug)]
pub struct ShaderProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

impl ShaderProgram {
    /// Reads and compiles both stages.
    pub fn load(gpu: &GpuContext, paths: &ShaderPaths) -> Result<Self, ShaderError> {
        log::info!(
            "loading shaders {} and {}",
            paths.vertex.display(),
            paths.fragment.display()
        );

        let vertex = ShaderSource::load(&paths.vertex)?.compile(gpu)?;
        let fragment = ShaderSource::load(&paths.fragment)?.compile(gpu)?;

        Ok(Self { vertex, fragment })
    }
}

/// Runs `create` inside a validation error scope and returns its result, or the
/// validation message if the scope caught an error.
pub(crate) fn capture_validation<T>(
    gpu: &GpuContext,
    create: impl FnOnce() -> T,
) -> Result<T, String> {
    gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(gpu.device.pop_error_scope()) {
        Some(error) => Err(error.to_string()),
        None => Ok(value),
    }
}
