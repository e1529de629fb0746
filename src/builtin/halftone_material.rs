use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glamx::{Mat3, Mat4};

use crate::camera::Camera3d;
use crate::context::Context;
use crate::resource::ShaderMaterial;
use crate::scene::{DrawItem, ObjectId};

/// Frame-level uniforms (view, projection, eye, output options).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct FrameUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    options: [f32; 4],
}

/// Object-level uniforms (model and normal matrices).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    // mat3x3 padded to mat4x4 for alignment
    normal_matrix: [[f32; 4]; 4],
}

/// Per-object GPU data: the object transform and its material's uniform block.
struct ObjectGpuData {
    object_uniform_buffer: wgpu::Buffer,
    halftone_uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// GPU side of the halftone shader material.
///
/// Owns the render pipeline built from the material's program, the frame
/// uniforms, and the per-object uniform buffers, created the first time an
/// object is drawn and released once it leaves the scene.
pub struct HalftoneMaterial {
    pipeline: wgpu::RenderPipeline,
    frame_uniform_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    objects: HashMap<ObjectId, ObjectGpuData>,
}

impl HalftoneMaterial {
    /// Creates the pipeline for `material`'s program.
    pub fn new(ctxt: &Context, material: &ShaderMaterial, sample_count: u32) -> HalftoneMaterial {
        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let frame_bind_group_layout =
            ctxt.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("halftone_material_frame_bind_group_layout"),
                    entries: &[uniform_entry(0)],
                });

        let object_bind_group_layout =
            ctxt.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("halftone_material_object_bind_group_layout"),
                    entries: &[uniform_entry(0), uniform_entry(1)],
                });

        let pipeline_layout = ctxt
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("halftone_material_pipeline_layout"),
                bind_group_layouts: &[&frame_bind_group_layout, &object_bind_group_layout],
                push_constant_ranges: &[],
            });

        let shader = ctxt.create_shader_module(Some("halftone_material_shader"), material.source);

        // Vertex buffer layouts
        let vertex_buffer_layouts = [
            // Vertex positions
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            // Normals
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
        ];

        let pipeline = ctxt
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("halftone_material_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(material.vertex_entry),
                    buffers: &vertex_buffer_layouts,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(material.fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctxt.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                // Both faces are shaded; the shader flips back-facing normals.
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: Context::depth_format(),
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count.max(1),
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        let frame_uniform_buffer = ctxt.create_buffer_simple(
            Some("halftone_material_frame_uniform_buffer"),
            std::mem::size_of::<FrameUniforms>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let frame_bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("halftone_material_frame_bind_group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform_buffer.as_entire_binding(),
            }],
        });

        HalftoneMaterial {
            pipeline,
            frame_uniform_buffer,
            frame_bind_group,
            object_bind_group_layout,
            objects: HashMap::new(),
        }
    }

    /// Uploads the camera matrices for the next draws.
    pub fn prepare_frame(&mut self, ctxt: &Context, camera: &dyn Camera3d) {
        let encode_srgb = if ctxt.encodes_srgb_in_shader() { 1.0 } else { 0.0 };

        let frame_uniforms = FrameUniforms {
            view: camera.view().to_cols_array_2d(),
            proj: camera.projection().to_cols_array_2d(),
            camera_position: camera.eye().extend(1.0).to_array(),
            options: [encode_srgb, 0.0, 0.0, 0.0],
        };

        ctxt.write_buffer(
            &self.frame_uniform_buffer,
            0,
            bytemuck::bytes_of(&frame_uniforms),
        );
    }

    /// Uploads the transform and material uniforms of one object.
    pub fn prepare_object(&mut self, ctxt: &Context, item: &DrawItem) {
        let layout = &self.object_bind_group_layout;
        let gpu_data = self
            .objects
            .entry(item.object)
            .or_insert_with(|| create_object_gpu_data(ctxt, layout));

        let object_uniforms = ObjectUniforms {
            model: item.model.to_cols_array_2d(),
            normal_matrix: pad_mat3(item.normal_matrix),
        };
        ctxt.write_buffer(
            &gpu_data.object_uniform_buffer,
            0,
            bytemuck::bytes_of(&object_uniforms),
        );

        let halftone_uniforms = item.material.borrow().uniforms.to_block();
        ctxt.write_buffer(
            &gpu_data.halftone_uniform_buffer,
            0,
            bytemuck::bytes_of(&halftone_uniforms),
        );
    }

    /// Binds the pipeline and the frame uniforms.
    pub fn begin(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
    }

    /// Binds the uniforms of a prepared object. Returns `false` if it was not prepared.
    pub fn bind_object(&self, render_pass: &mut wgpu::RenderPass<'_>, object: ObjectId) -> bool {
        match self.objects.get(&object) {
            Some(gpu_data) => {
                render_pass.set_bind_group(1, &gpu_data.bind_group, &[]);
                true
            }
            None => false,
        }
    }

    /// Releases the GPU data of objects no longer drawn.
    pub fn retain_objects(&mut self, mut live: impl FnMut(ObjectId) -> bool) {
        self.objects.retain(|id, _| live(*id));
    }
}

fn create_object_gpu_data(ctxt: &Context, layout: &wgpu::BindGroupLayout) -> ObjectGpuData {
    let object_uniform_buffer = ctxt.create_buffer_simple(
        Some("halftone_material_object_uniform_buffer"),
        std::mem::size_of::<ObjectUniforms>() as u64,
        wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    );
    let halftone_uniform_buffer = ctxt.create_buffer_simple(
        Some("halftone_material_uniform_buffer"),
        std::mem::size_of::<crate::resource::HalftoneUniformBlock>() as u64,
        wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    );

    let bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("halftone_material_object_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: object_uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: halftone_uniform_buffer.as_entire_binding(),
            },
        ],
    });

    ObjectGpuData {
        object_uniform_buffer,
        halftone_uniform_buffer,
        bind_group,
    }
}

fn pad_mat3(m: Mat3) -> [[f32; 4]; 4] {
    Mat4::from_mat3(m).to_cols_array_2d()
}
