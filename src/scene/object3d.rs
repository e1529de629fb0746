//! Renderable objects.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::resource::{MaterialHandle, Mesh3d};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(0);

/// Identifier of an [`Object3d`], used by the renderer to cache its per-object uniforms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(u64);

/// A mesh together with the material it is shaded with.
///
/// An object without a material is skipped by the renderer.
#[derive(Clone)]
pub struct Object3d {
    id: ObjectId,
    mesh: Rc<Mesh3d>,
    material: Option<MaterialHandle>,
}

impl Object3d {
    /// Creates an object drawing `mesh` with the given material.
    pub fn new(mesh: Rc<Mesh3d>, material: Option<MaterialHandle>) -> Object3d {
        Object3d {
            id: ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)),
            mesh,
            material,
        }
    }

    /// The object identifier.
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The mesh drawn by this object.
    #[inline]
    pub fn mesh(&self) -> &Rc<Mesh3d> {
        &self.mesh
    }

    /// The material of this object, if any.
    #[inline]
    pub fn material(&self) -> Option<&MaterialHandle> {
        self.material.as_ref()
    }

    /// Replaces the material of this object.
    #[inline]
    pub fn set_material(&mut self, material: MaterialHandle) {
        self.material = Some(material)
    }
}
