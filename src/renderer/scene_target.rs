//! The buffer the scene is drawn into.
//!
//! The scene is drawn at its logical size times the clamped pixel ratio. When
//! that differs from the physical size of the window surface (displays denser
//! than [`MAX_PIXEL_RATIO`](crate::viewport::MAX_PIXEL_RATIO)), it goes into
//! an offscreen buffer that a fullscreen pass then scales onto the surface.

use bytemuck::{Pod, Zeroable};

use crate::context::Context;

/// Where the scene of a frame is drawn, and at which size.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneBuffer {
    /// Straight into the window surface, of the given physical size.
    Surface(u32, u32),
    /// Into an offscreen buffer of the given size, scaled to the surface afterwards.
    Offscreen(u32, u32),
}

impl SceneBuffer {
    /// Picks the scene buffer for a logical `size` drawn at `pixel_ratio` on a
    /// surface of `physical` size.
    ///
    /// The surface is used directly when the drawing buffer matches it up to
    /// the rounding of the logical size.
    pub fn select(size: (u32, u32), pixel_ratio: f32, physical: (u32, u32)) -> SceneBuffer {
        let (width, height) = drawing_buffer_size(size.0, size.1, pixel_ratio);

        if width.abs_diff(physical.0) <= 1 && height.abs_diff(physical.1) <= 1 {
            SceneBuffer::Surface(physical.0, physical.1)
        } else {
            SceneBuffer::Offscreen(width, height)
        }
    }

    /// The size of the buffer, in pixels.
    pub fn size(&self) -> (u32, u32) {
        match *self {
            SceneBuffer::Surface(width, height) | SceneBuffer::Offscreen(width, height) => {
                (width, height)
            }
        }
    }

    /// Whether the buffer is separate from the surface.
    pub fn is_offscreen(&self) -> bool {
        matches!(self, SceneBuffer::Offscreen(..))
    }
}

/// Size of the drawing buffer of a `width`x`height` logical area drawn at
/// `pixel_ratio`. Never smaller than 1x1.
pub fn drawing_buffer_size(width: u32, height: u32, pixel_ratio: f32) -> (u32, u32) {
    let scale = |v: u32| ((v as f32 * pixel_ratio).round() as u32).max(1);
    (scale(width), scale(height))
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
}

/// An offscreen color buffer the scene is resolved into, bound for sampling.
pub struct SceneTarget {
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

impl SceneTarget {
    /// Creates a `width`x`height` buffer in the surface format, sampled by `blit`.
    pub fn new(ctxt: &Context, blit: &BlitPass, width: u32, height: u32) -> SceneTarget {
        let texture = ctxt.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("scene_color_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctxt.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_target_bind_group"),
            layout: &blit.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&blit.sampler),
                },
            ],
        });

        SceneTarget { view, bind_group }
    }

    /// The view the scene pass writes or resolves its colors into.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Scales an offscreen [`SceneTarget`] onto the window surface.
pub struct BlitPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    vertex_buffer: wgpu::Buffer,
}

impl BlitPass {
    /// Creates the fullscreen pipeline writing to the surface format.
    pub fn new(ctxt: &Context) -> BlitPass {
        let bind_group_layout =
            ctxt.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("blit_bind_group_layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout = ctxt
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("blit_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let shader = ctxt.create_shader_module(Some("blit_shader"), include_str!("blit.wgsl"));

        let vertex_buffer_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        };

        let pipeline = ctxt
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("blit_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_buffer_layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctxt.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let sampler = ctxt.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let vertices = [
            QuadVertex {
                position: [-1.0, -1.0],
            },
            QuadVertex {
                position: [1.0, -1.0],
            },
            QuadVertex {
                position: [-1.0, 1.0],
            },
            QuadVertex {
                position: [1.0, 1.0],
            },
        ];

        let vertex_buffer = ctxt.create_buffer_init(
            Some("blit_vertex_buffer"),
            bytemuck::cast_slice(&vertices),
            wgpu::BufferUsages::VERTEX,
        );

        BlitPass {
            pipeline,
            bind_group_layout,
            sampler,
            vertex_buffer,
        }
    }

    /// Records the copy of `source` onto `output`, covering it entirely.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, source: &SceneTarget, output: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blit_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &source.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..4, 0..1);
    }
}
