use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::batch::{BatchBackend, ListId, ShapeKind, Topology};
use crate::screen::ScreenDraw;

/// Depth format the screen passes render against. The owning device context
/// must create its depth texture with this format.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct BatchVertex {
    pos: [f32; 3],
    color: [u8; 4], // Unorm8x4; alpha fixed at 255
}

impl BatchVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Unorm8x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BatchVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TransformUniform {
    transform: [[f32; 4]; 4],
}

/// One uploaded primitive list.
struct GpuList {
    topology: Topology,
    vertex_buf: wgpu::Buffer,
    vertex_count: u32,
    index_buf: Option<wgpu::Buffer>,
    index_count: u32,
}

/// wgpu implementation of the batch seam.
///
/// Owns one pipeline per topology and the vertex buffers behind every live
/// [`ListId`]. Releasing a list drops its buffers; wgpu reclaims them once
/// in-flight work completes.
pub struct WgpuBatch {
    device: wgpu::Device,
    bind_group_layout: wgpu::BindGroupLayout,
    pipelines: [wgpu::RenderPipeline; 4],
    lists: HashMap<u64, GpuList>,
    next_id: u64,
}

impl WgpuBatch {
    pub fn new(device: wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery batch shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/batch.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("orrery batch bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(transform_ubo_min_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery batch pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipelines = [
            Topology::PointList,
            Topology::LineList,
            Topology::LineStrip,
            Topology::TriangleList,
        ]
        .map(|topology| {
            create_pipeline(&device, &shader, &pipeline_layout, surface_format, topology)
        });

        Self {
            device,
            bind_group_layout,
            pipelines,
            lists: HashMap::new(),
            next_id: 0,
        }
    }

    fn pipeline_for(&self, topology: Topology) -> &wgpu::RenderPipeline {
        let index = match topology {
            Topology::PointList => 0,
            Topology::LineList => 1,
            Topology::LineStrip => 2,
            Topology::TriangleList => 3,
        };
        &self.pipelines[index]
    }

    /// Issues one screen's batched draw: background first, then the shape
    /// kinds, all scissored to the screen rect and sharing one transform.
    ///
    /// The depth attachment is cleared per pass; screens occupy disjoint
    /// scissor rects, so earlier screens' depth is irrelevant here.
    pub fn draw_screen(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        draw: &ScreenDraw,
    ) {
        let mut ids: Vec<ListId> = Vec::with_capacity(1 + ShapeKind::COUNT);
        ids.extend(draw.background);
        ids.extend(draw.kinds.iter().flatten());

        let lists: Vec<&GpuList> = ids
            .iter()
            .filter_map(|id| self.lists.get(&id.raw()))
            .collect();
        if lists.is_empty() {
            return;
        }

        // Transient per-draw uniform; screens are few, churn is negligible.
        let ubo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orrery batch transform ubo"),
            contents: bytemuck::bytes_of(&TransformUniform {
                transform: draw.transform.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery batch bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orrery screen pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (sx, sy, sw, sh) = draw.scissor;
        rpass.set_scissor_rect(sx, sy, sw, sh);
        rpass.set_bind_group(0, &bind_group, &[]);

        for list in lists {
            rpass.set_pipeline(self.pipeline_for(list.topology));
            rpass.set_vertex_buffer(0, list.vertex_buf.slice(..));
            match &list.index_buf {
                Some(index_buf) => {
                    rpass.set_index_buffer(index_buf.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..list.index_count, 0, 0..1);
                }
                None => rpass.draw(0..list.vertex_count, 0..1),
            }
        }
    }
}

impl BatchBackend for WgpuBatch {
    fn upload(&mut self, kind: ShapeKind, vertices: &[f32], colors: &[u8]) -> ListId {
        debug_assert_eq!(vertices.len(), colors.len());
        let vertex_count = vertices.len() / 3;

        let data: Vec<BatchVertex> = (0..vertex_count)
            .map(|i| BatchVertex {
                pos: [vertices[i * 3], vertices[i * 3 + 1], vertices[i * 3 + 2]],
                color: [colors[i * 3], colors[i * 3 + 1], colors[i * 3 + 2], 255],
            })
            .collect();

        let vertex_buf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orrery batch vbo"),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (index_buf, index_count) = if kind.indexed() {
            let indices = quad_indices(vertex_count);
            let buf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("orrery batch ibo"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            (Some(buf), indices.len() as u32)
        } else {
            (None, 0)
        };

        let id = self.next_id;
        self.next_id += 1;
        self.lists.insert(
            id,
            GpuList {
                topology: kind.topology(),
                vertex_buf,
                vertex_count: vertex_count as u32,
                index_buf,
                index_count,
            },
        );
        ListId::from_raw(id)
    }

    fn release(&mut self, id: ListId) {
        self.lists.remove(&id.raw());
    }
}

/// Expands 4-vertex quads into two triangles each.
fn quad_indices(vertex_count: usize) -> Vec<u32> {
    let quads = vertex_count / 4;
    let mut indices = Vec::with_capacity(quads * 6);
    for q in 0..quads {
        let base = (q * 4) as u32;
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    topology: Topology,
) -> wgpu::RenderPipeline {
    let wgpu_topology = match topology {
        Topology::PointList => wgpu::PrimitiveTopology::PointList,
        Topology::LineList => wgpu::PrimitiveTopology::LineList,
        Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("orrery batch pipeline"),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[BatchVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu_topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

/// Minimum binding size for the transform uniform.
///
/// Centralising this avoids `.unwrap()` at the layout-creation site.
fn transform_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<TransformUniform>() as u64)
        .expect("TransformUniform has non-zero size by construction")
}
