//! Flat-colored mesh rendering with depth testing.
//!
//! [`FlatPass`] draws every queued mesh with a single color and a model-view
//! matrix, both supplied per draw. The projection is shared by the whole frame.
//!
//! # Bind groups
//!
//! - **Group 0**: [`FrameUniforms`], the projection matrix
//! - **Group 1**: [`DrawUniforms`], one slot per draw addressed with a dynamic offset
//!
//! Per-draw uniforms are packed into one buffer and uploaded once per frame, so
//! every draw in a pass sees its own matrix and color.

use std::num::NonZeroU64;

use glam::Mat4;

use crate::color::Color;
use crate::error::ShaderError;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, MeshId, Vertex};
use crate::shader::{self, ShaderProgram};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_DRAW_CAPACITY: usize = 32;

/// Projection shared by all draws of a frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub projection: [[f32; 4]; 4],
}

/// Per-draw transform and color.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model_view: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// One mesh queued for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshId,
    pub model_view: Mat4,
    pub color: Color,
}

impl DrawCommand {
    fn uniforms(&self) -> DrawUniforms {
        DrawUniforms {
            model_view: self.model_view.to_cols_array_2d(),
            color: self.color.to_array(),
        }
    }
}

/// Rounds `size` up to the next multiple of `alignment`.
fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Packs per-draw uniforms at `stride` byte intervals.
fn pack_draws(draws: &[DrawCommand], stride: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; draws.len() * stride];
    for (slot, draw) in bytes.chunks_exact_mut(stride).zip(draws) {
        let uniforms = draw.uniforms();
        let src = bytemuck::bytes_of(&uniforms);
        slot[..src.len()].copy_from_slice(src);
    }
    bytes
}

/// Renders flat-colored meshes into the surface with a depth buffer.
///
/// The fill pipeline is always present. A line pipeline is built only when the
/// device was created with `POLYGON_MODE_LINE`; [`render`](Self::render) falls
/// back to filled polygons without it.
pub struct FlatPass {
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: Option<wgpu::RenderPipeline>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    draw_stride: u64,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl FlatPass {
    /// Links the shader pair into the fill (and, if supported, line) pipelines.
    ///
    /// Pipeline creation runs inside a validation scope; an interface mismatch
    /// between the two stages or with the vertex layout is reported as
    /// [`ShaderError::Link`].
    pub fn new(gpu: &GpuContext, program: &ShaderProgram) -> Result<Self, ShaderError> {
        let device = &gpu.device;

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                },
                count: None,
            }],
        });

        let draw_stride = aligned_stride(
            std::mem::size_of::<DrawUniforms>() as u64,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let (draw_buffer, draw_bind_group) =
            Self::create_draw_buffer(gpu, &draw_layout, draw_stride, INITIAL_DRAW_CAPACITY);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flat Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let fill_pipeline = Self::create_pipeline(
            gpu,
            &pipeline_layout,
            program,
            wgpu::PolygonMode::Fill,
        )?;

        let line_pipeline = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(Self::create_pipeline(
                gpu,
                &pipeline_layout,
                program,
                wgpu::PolygonMode::Line,
            )?)
        } else {
            log::debug!("POLYGON_MODE_LINE not enabled; wireframe draws filled");
            None
        };

        Ok(Self {
            fill_pipeline,
            line_pipeline,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            draw_stride,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
        })
    }

    fn create_pipeline(
        gpu: &GpuContext,
        layout: &wgpu::PipelineLayout,
        program: &ShaderProgram,
        polygon_mode: wgpu::PolygonMode,
    ) -> Result<wgpu::RenderPipeline, ShaderError> {
        let label = match polygon_mode {
            wgpu::PolygonMode::Line => "Flat Line Pipeline",
            _ => "Flat Fill Pipeline",
        };

        shader::capture_validation(gpu, || {
            gpu.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(label),
                    layout: Some(layout),
                    vertex: wgpu::VertexState {
                        module: &program.vertex,
                        entry_point: Some(shader::VERTEX_ENTRY),
                        buffers: &[Vertex::LAYOUT],
                        compilation_options: Default::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &program.fragment,
                        entry_point: Some(shader::FRAGMENT_ENTRY),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: gpu.config.format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        cull_mode: None,
                        polygon_mode,
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                    cache: None,
                })
        })
        .map_err(|message| ShaderError::Link { message })
    }

    fn create_draw_buffer(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    fn ensure_draw_capacity(&mut self, gpu: &GpuContext, count: usize) {
        if count <= self.draw_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        log::debug!("growing draw uniform buffer to {capacity} slots");
        let (buffer, bind_group) =
            Self::create_draw_buffer(gpu, &self.draw_layout, self.draw_stride, capacity);
        self.draw_buffer = buffer;
        self.draw_bind_group = bind_group;
        self.draw_capacity = capacity;
    }

    /// Clears color and depth, then draws `draws` in order.
    ///
    /// Draws referring to an unknown mesh are skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: Color,
        projection: Mat4,
        wireframe: bool,
        meshes: &[Mesh],
        draws: &[DrawCommand],
    ) {
        self.ensure_depth_size(gpu);
        self.ensure_draw_capacity(gpu, draws.len());

        let frame = FrameUniforms {
            projection: projection.to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        if !draws.is_empty() {
            let bytes = pack_draws(draws, self.draw_stride as usize);
            gpu.queue.write_buffer(&self.draw_buffer, 0, &bytes);
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Flat Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let pipeline = match (&self.line_pipeline, wireframe) {
            (Some(line), true) => line,
            _ => &self.fill_pipeline,
        };
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (slot, draw) in draws.iter().enumerate() {
            let Some(mesh) = meshes.get(draw.mesh.0) else {
                log::warn!("skipping draw of unknown mesh {:?}", draw.mesh);
                continue;
            };
            let offset = (slot as u64 * self.draw_stride) as u32;
            render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
            mesh.draw(&mut render_pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_uniforms_fit_wgsl_layout() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 64);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 80);
    }

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(80, 256), 256);
        assert_eq!(aligned_stride(80, 16), 80);
        assert_eq!(aligned_stride(80, 64), 128);
        assert_eq!(aligned_stride(80, 0), 80);
    }

    #[test]
    fn draws_land_at_their_slots() {
        let draws = [
            DrawCommand {
                mesh: MeshId(0),
                model_view: Mat4::IDENTITY,
                color: Color::RED,
            },
            DrawCommand {
                mesh: MeshId(1),
                model_view: Mat4::from_translation(glam::Vec3::new(2.0, 0.0, 0.0)),
                color: Color::GREEN,
            },
        ];

        let bytes = pack_draws(&draws, 256);
        assert_eq!(bytes.len(), 512);

        let second: DrawUniforms = bytemuck::pod_read_unaligned(&bytes[256..256 + 80]);
        assert_eq!(second.color, Color::GREEN.to_array());
        assert_eq!(second.model_view[3][0], 2.0);
        assert!(bytes[80..256].iter().all(|&b| b == 0));
    }
}
