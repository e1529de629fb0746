//! Meshes uploaded to the GPU.

use glamx::Vec3;

use crate::context::Context;
use crate::resource::Mesh3d;

/// Vertex and index buffers of a [`Mesh3d`].
pub struct GpuMesh3d {
    coords: wgpu::Buffer,
    normals: wgpu::Buffer,
    faces: wgpu::Buffer,
    num_indices: u32,
}

impl GpuMesh3d {
    /// Uploads `mesh` to the GPU.
    pub fn new(ctxt: &Context, mesh: &Mesh3d) -> GpuMesh3d {
        let data = mesh.data();
        let coords: Vec<[f32; 3]> = data.coords.iter().map(Vec3::to_array).collect();
        let normals: Vec<[f32; 3]> = data.normals.iter().map(Vec3::to_array).collect();

        GpuMesh3d {
            coords: ctxt.create_buffer_init(
                Some("mesh_coords"),
                bytemuck::cast_slice(&coords),
                wgpu::BufferUsages::VERTEX,
            ),
            normals: ctxt.create_buffer_init(
                Some("mesh_normals"),
                bytemuck::cast_slice(&normals),
                wgpu::BufferUsages::VERTEX,
            ),
            faces: ctxt.create_buffer_init(
                Some("mesh_faces"),
                bytemuck::cast_slice(&data.indices),
                wgpu::BufferUsages::INDEX,
            ),
            num_indices: mesh.num_indices(),
        }
    }

    /// Binds the buffers and draws the mesh.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.num_indices == 0 {
            return;
        }

        render_pass.set_vertex_buffer(0, self.coords.slice(..));
        render_pass.set_vertex_buffer(1, self.normals.slice(..));
        render_pass.set_index_buffer(self.faces.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}
