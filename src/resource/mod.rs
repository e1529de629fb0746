//! Materials, meshes and uniforms.

pub use self::gpu_mesh::GpuMesh3d;
pub use self::material::{shared, MaterialHandle, ShaderMaterial, HALFTONE_SRC};
pub use self::mesh::{Mesh3d, MeshId};
pub use self::uniforms::{HalftoneUniformBlock, HalftoneUniforms, UniformName, UniformValue};

mod gpu_mesh;
pub mod material;
mod mesh;
pub mod uniforms;
