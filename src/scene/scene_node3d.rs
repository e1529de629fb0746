use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use glamx::{Mat3, Mat4, Vec3};

use crate::procedural::RenderMesh;
use crate::resource::{MaterialHandle, Mesh3d};
use crate::scene::{Euler, Object3d, ObjectId, Transform};

/// The data contained by a `SceneNode3d`.
pub struct SceneNodeData3d {
    transform: Transform,
    visible: bool,
    children: Vec<SceneNode3d>,
    object: Option<Object3d>,
    parent: Option<Weak<RefCell<SceneNodeData3d>>>,
}

/// A node of the scene graph.
///
/// This may represent a group of other nodes, and/or contain an object that can be rendered.
/// Cloning a node yields another handle to the same node.
#[derive(Clone)]
pub struct SceneNode3d {
    data: Rc<RefCell<SceneNodeData3d>>,
}

/// One object to draw, with its world placement resolved.
#[derive(Clone)]
pub struct DrawItem {
    /// Identifier of the drawn object.
    pub object: ObjectId,
    /// The geometry.
    pub mesh: Rc<Mesh3d>,
    /// The material shading the geometry.
    pub material: MaterialHandle,
    /// Local-to-world matrix.
    pub model: Mat4,
    /// Inverse-transpose of the upper 3x3 block of `model`.
    pub normal_matrix: Mat3,
}

impl SceneNodeData3d {
    fn remove(&mut self, o: &SceneNode3d) {
        if let Some(i) = self
            .children
            .iter()
            .rposition(|e| Rc::ptr_eq(&o.data, &e.data))
        {
            let _ = self.children.remove(i);
        }
    }

    /// Whether this node contains an `Object3d`.
    #[inline]
    pub fn has_object(&self) -> bool {
        self.object.is_some()
    }

    /// Whether this node has no parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The object of this node, if any.
    #[inline]
    pub fn object(&self) -> Option<&Object3d> {
        self.object.as_ref()
    }

    /// The object of this node, if any.
    #[inline]
    pub fn object_mut(&mut self) -> Option<&mut Object3d> {
        self.object.as_mut()
    }

    /// The children of this node.
    #[inline]
    pub fn children(&self) -> &[SceneNode3d] {
        &self.children
    }

    /// The local transform of this node.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Whether this node and its children are drawn.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn collect_draws(&self, parent: Mat4, out: &mut Vec<DrawItem>) {
        if !self.visible {
            return;
        }

        let world = parent * self.transform.to_mat4();

        if let Some(object) = &self.object {
            if let Some(material) = object.material() {
                out.push(DrawItem {
                    object: object.id(),
                    mesh: object.mesh().clone(),
                    material: material.clone(),
                    model: world,
                    normal_matrix: Mat3::from_mat4(world).inverse().transpose(),
                });
            }
        }

        for child in &self.children {
            child.data().collect_draws(world, out);
        }
    }
}

impl Default for SceneNode3d {
    fn default() -> SceneNode3d {
        SceneNode3d::empty()
    }
}

impl SceneNode3d {
    /// Creates a new unrooted node.
    pub fn new(transform: Transform, object: Option<Object3d>) -> SceneNode3d {
        let data = SceneNodeData3d {
            transform,
            visible: true,
            children: Vec::new(),
            object,
            parent: None,
        };

        SceneNode3d {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Creates a new empty, unrooted node with an identity transform.
    pub fn empty() -> SceneNode3d {
        SceneNode3d::new(Transform::default(), None)
    }

    /// Creates an unrooted node drawing `mesh`, without material.
    pub fn render_mesh(mesh: RenderMesh) -> SceneNode3d {
        let object = Object3d::new(Rc::new(Mesh3d::new(mesh)), None);
        SceneNode3d::new(Transform::default(), Some(object))
    }

    /// Removes this node from its parent in the scene graph.
    pub fn remove(&mut self) {
        let parent = self.data_mut().parent.take();

        if let Some(parent) = parent.and_then(|p| p.upgrade()) {
            parent.borrow_mut().remove(self);
        }
    }

    /// Returns an immutable reference to this node's internal data.
    pub fn data(&self) -> Ref<'_, SceneNodeData3d> {
        self.data.borrow()
    }

    /// Returns a mutable reference to this node's internal data.
    pub fn data_mut(&mut self) -> RefMut<'_, SceneNodeData3d> {
        self.data.borrow_mut()
    }

    /// Whether `self` and `other` are handles to the same node.
    pub fn ptr_eq(&self, other: &SceneNode3d) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /*
     *
     * Methods to add objects.
     *
     */
    /// Adds an empty group node as a child of this node.
    pub fn add_group(&mut self) -> SceneNode3d {
        let node = SceneNode3d::empty();
        self.add_child(node.clone());
        node
    }

    /// Adds an existing node as a child of this node.
    ///
    /// # Panics
    /// Panics if the node already has a parent
    pub fn add_child(&mut self, node: SceneNode3d) {
        assert!(
            node.data().is_root(),
            "The added node must not have a parent yet."
        );

        let mut node = node;
        node.data_mut().parent = Some(Rc::downgrade(&self.data));
        self.data_mut().children.push(node)
    }

    /// Adds a child node drawing `mesh` with `material`.
    pub fn add_render_mesh(&mut self, mesh: RenderMesh, material: MaterialHandle) -> SceneNode3d {
        let mut node = SceneNode3d::render_mesh(mesh);
        node.set_material(material);
        self.add_child(node.clone());
        node
    }

    /// Applies a closure to this node and each of its descendants.
    pub fn apply_to_scene_nodes_mut<F: FnMut(&mut SceneNode3d)>(&mut self, f: &mut F) {
        f(self);

        for c in self.data_mut().children.iter_mut() {
            c.apply_to_scene_nodes_mut(f)
        }
    }

    /// Applies a closure to each object contained by this node and its children.
    pub fn apply_to_objects_mut<F: FnMut(&mut Object3d)>(&mut self, f: &mut F) {
        self.apply_to_scene_nodes_mut(&mut |n| {
            if let Some(o) = n.data_mut().object_mut() {
                f(o)
            }
        })
    }

    /// Sets the material of all objects in this node and its children.
    pub fn set_material(&mut self, material: MaterialHandle) -> Self {
        self.apply_to_objects_mut(&mut |o| o.set_material(material.clone()));
        self.clone()
    }

    /// Number of objects in this node and its children.
    pub fn num_objects(&self) -> usize {
        let data = self.data();
        data.object.iter().count() + data.children.iter().map(|c| c.num_objects()).sum::<usize>()
    }

    /// Sets the visibility of this node.
    pub fn set_visible(&mut self, visible: bool) -> Self {
        self.data_mut().visible = visible;
        self.clone()
    }

    /*
     *
     * Transformation accessors.
     *
     */
    /// The local transform of this node.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.data().transform
    }

    /// Replaces the local transform of this node.
    #[inline]
    pub fn set_transform(&mut self, transform: Transform) -> Self {
        self.data_mut().transform = transform;
        self.clone()
    }

    /// The local position of this node.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.data().transform.position
    }

    /// Sets the local position of this node.
    #[inline]
    pub fn set_position(&mut self, t: Vec3) -> Self {
        self.data_mut().transform.position = t;
        self.clone()
    }

    /// The local rotation of this node.
    #[inline]
    pub fn rotation(&self) -> Euler {
        self.data().transform.rotation
    }

    /// Sets the local rotation of this node.
    #[inline]
    pub fn set_rotation(&mut self, r: Euler) -> Self {
        self.data_mut().transform.rotation = r;
        self.clone()
    }

    /// The local scale of this node.
    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.data().transform.scale
    }

    /// Sets the local scale of this node.
    #[inline]
    pub fn set_local_scale(&mut self, sx: f32, sy: f32, sz: f32) -> Self {
        self.data_mut().transform.scale = Vec3::new(sx, sy, sz);
        self.clone()
    }

    /// Collects the objects to draw, in depth-first order, with their world matrices.
    ///
    /// Invisible subtrees and objects without material are skipped.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut out = Vec::new();
        self.data().collect_draws(Mat4::IDENTITY, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HalftoneConfig;
    use crate::procedural;
    use crate::resource::{shared, HalftoneUniforms, ShaderMaterial};
    use crate::viewport::Viewport;

    fn material() -> MaterialHandle {
        let uniforms = HalftoneUniforms::from_config(
            &HalftoneConfig::default(),
            &Viewport::new(800, 600, 1.0),
        );
        shared(ShaderMaterial::halftone(uniforms))
    }

    #[test]
    fn children_inherit_parent_transform() {
        let mut root = SceneNode3d::empty();
        let mut group = root.add_group();
        group.set_position(Vec3::new(1.0, 0.0, 0.0));
        group.set_local_scale(2.0, 2.0, 2.0);

        let mut child = group.add_render_mesh(procedural::unit_sphere(), material());
        child.set_position(Vec3::new(0.0, 1.0, 0.0));

        let draws = root.draw_list();
        assert_eq!(draws.len(), 1);
        let origin = draws[0].model.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1.0e-6);
    }

    #[test]
    fn objects_without_material_are_not_drawn() {
        let mut root = SceneNode3d::empty();
        root.add_child(SceneNode3d::render_mesh(procedural::unit_sphere()));
        assert_eq!(root.num_objects(), 1);
        assert!(root.draw_list().is_empty());
    }

    #[test]
    fn set_material_reaches_every_descendant() {
        let shared_material = material();
        let mut model = SceneNode3d::empty();
        let mut inner = model.add_group();
        inner.add_child(SceneNode3d::render_mesh(procedural::unit_sphere()));
        model.add_child(SceneNode3d::render_mesh(procedural::unit_sphere()));

        model.set_material(shared_material.clone());

        let draws = model.draw_list();
        assert_eq!(draws.len(), 2);
        assert!(draws
            .iter()
            .all(|d| Rc::ptr_eq(&d.material, &shared_material)));
    }

    #[test]
    fn removed_nodes_leave_their_parent() {
        let mut root = SceneNode3d::empty();
        let mut child = root.add_group();
        assert_eq!(root.data().children().len(), 1);
        child.remove();
        assert!(root.data().children().is_empty());
        assert!(child.data().is_root());
    }

    #[test]
    fn invisible_subtrees_are_skipped() {
        let mut root = SceneNode3d::empty();
        let mut node = root.add_render_mesh(procedural::unit_sphere(), material());
        node.set_visible(false);
        assert!(root.draw_list().is_empty());
    }
}
