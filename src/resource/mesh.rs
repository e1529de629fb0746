//! Meshes shared between scene nodes.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::procedural::RenderMesh;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(0);

/// Identifier of a [`Mesh3d`], used by the renderer to cache GPU buffers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MeshId(u64);

/// CPU-side geometry of a renderable object.
///
/// The renderer uploads it lazily, the first time it is drawn.
#[derive(Debug)]
pub struct Mesh3d {
    id: MeshId,
    data: RenderMesh,
}

impl Mesh3d {
    /// Wraps the given geometry, assigning it a fresh identifier.
    pub fn new(data: RenderMesh) -> Mesh3d {
        Mesh3d {
            id: MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed)),
            data,
        }
    }

    /// The mesh identifier.
    #[inline]
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// The mesh geometry.
    #[inline]
    pub fn data(&self) -> &RenderMesh {
        &self.data
    }

    /// Number of indices to draw.
    #[inline]
    pub fn num_indices(&self) -> u32 {
        (self.data.indices.len() * 3) as u32
    }
}

impl From<RenderMesh> for Mesh3d {
    fn from(data: RenderMesh) -> Self {
        Mesh3d::new(data)
    }
}
