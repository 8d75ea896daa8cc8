//! Vertex format and GPU-resident meshes.
//!
//! Both demos feed the same shader interface: a single homogeneous position per
//! vertex and a flat color supplied as a uniform. There are no normals, texture
//! coordinates or per-vertex colors.
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x4 | 0      | 0               |
//!
//! The layout is exposed via [`Vertex::LAYOUT`] for pipeline creation.

use crate::geometry::RawGeometry;
use crate::gpu::GpuContext;

/// A homogeneous vertex position `(x, y, z, w)`.
///
/// Uses `#[repr(C)]` and derives [`bytemuck::Pod`] so a `&[Vertex]` can be uploaded
/// as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
}

impl Vertex {
    /// The wgpu vertex buffer layout for this vertex type: 16 bytes per vertex,
    /// position at location 0.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x4,
        }],
    };

    /// Creates a vertex at `(x, y, z)` with `w = 1`.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z, 1.0],
        }
    }

    /// Length of the `xyz` part of the position.
    pub fn length(&self) -> f32 {
        let [x, y, z, _] = self.position;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Type-safe handle to a mesh registered with the running app.
///
/// Returned by [`SetupContext::add_mesh`](crate::SetupContext::add_mesh) and passed to
/// [`Frame::draw`](crate::Frame::draw).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// GPU-resident geometry: a vertex buffer and, for indexed meshes, an index buffer.
///
/// Meshes are uploaded once during setup and never resized.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: Option<wgpu::Buffer>,
    /// Number of indices for indexed meshes, number of vertices otherwise.
    pub(crate) element_count: u32,
}

impl Mesh {
    /// Uploads validated geometry into static GPU buffers.
    pub fn new(gpu: &GpuContext, geometry: &RawGeometry, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = geometry.indices.as_ref().map(|indices| {
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} Index Buffer")),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
        });

        Self {
            vertex_buffer,
            index_buffer,
            element_count: geometry.element_count() as u32,
        }
    }

    /// Records the draw for this mesh into an active render pass.
    pub(crate) fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(index_buffer) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.element_count, 0, 0..1);
            }
            None => render_pass.draw(0..self.element_count, 0..1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_four_packed_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        assert_eq!(Vertex::LAYOUT.array_stride, 16);
    }

    #[test]
    fn new_vertex_is_homogeneous() {
        let v = Vertex::new(3.0, 0.0, 4.0);
        assert_eq!(v.position[3], 1.0);
        assert_eq!(v.length(), 5.0);
    }
}
