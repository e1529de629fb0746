use glamx::{Quat, Vec3};
use log::debug;

use crate::error::{Error, Result};
use crate::procedural::RenderMesh;
use crate::scene::{Euler, SceneNode3d, Transform};

/// CPU-side content of a loaded model: its node hierarchy and geometry.
///
/// This holds no GPU or scene-graph handle, so it can be sent across threads.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    /// Root nodes of the model's default scene.
    pub roots: Vec<ModelNode>,
}

/// A node of a loaded model.
#[derive(Debug, Clone, Default)]
pub struct ModelNode {
    /// Node name, if the asset provides one.
    pub name: Option<String>,
    /// Transform relative to the parent node.
    pub transform: Transform,
    /// One mesh per triangle primitive of the node.
    pub meshes: Vec<RenderMesh>,
    /// Child nodes.
    pub children: Vec<ModelNode>,
}

impl ModelData {
    /// Extracts the default scene of a glTF document.
    ///
    /// Falls back to the first scene if the document does not name a default one.
    pub fn from_document(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<ModelData> {
        let scene = match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => scene,
            None => return Ok(ModelData::default()),
        };

        let roots = scene
            .nodes()
            .map(|node| load_node(&node, buffers))
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelData { roots })
    }

    /// Total number of meshes in the model.
    pub fn num_meshes(&self) -> usize {
        self.roots.iter().map(ModelNode::num_meshes).sum()
    }

    /// Builds the scene subtree of this model.
    ///
    /// Meshes are created without material.
    pub fn to_scene_node(&self) -> SceneNode3d {
        let mut root = SceneNode3d::empty();

        for node in &self.roots {
            root.add_child(node.to_scene_node());
        }

        root
    }
}

impl ModelNode {
    fn num_meshes(&self) -> usize {
        self.meshes.len() + self.children.iter().map(ModelNode::num_meshes).sum::<usize>()
    }

    fn to_scene_node(&self) -> SceneNode3d {
        let mut node = SceneNode3d::new(self.transform, None);

        for mesh in &self.meshes {
            node.add_child(SceneNode3d::render_mesh(mesh.clone()));
        }

        for child in &self.children {
            node.add_child(child.to_scene_node());
        }

        node
    }
}

fn load_node(node: &gltf::Node<'_>, buffers: &[gltf::buffer::Data]) -> Result<ModelNode> {
    let (translation, rotation, scale) = node.transform().decomposed();

    let transform = Transform {
        position: Vec3::from(translation),
        rotation: Euler::from_quat(Quat::from_array(rotation)),
        scale: Vec3::from(scale),
    };

    let meshes = match node.mesh() {
        Some(mesh) => load_mesh(&mesh, buffers)?,
        None => Vec::new(),
    };

    let children = node
        .children()
        .map(|c| load_node(&c, buffers))
        .collect::<Result<Vec<_>>>()?;

    Ok(ModelNode {
        name: node.name().map(String::from),
        transform,
        meshes,
        children,
    })
}

fn load_mesh(mesh: &gltf::Mesh<'_>, buffers: &[gltf::buffer::Data]) -> Result<Vec<RenderMesh>> {
    let mut out = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            debug!(
                "Skipping primitive {} of mesh {}: unsupported mode {:?}",
                primitive.index(),
                mesh.index(),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

        let coords: Vec<Vec3> = reader
            .read_positions()
            .ok_or(Error::MissingPositions {
                mesh: mesh.index(),
                primitive: primitive.index(),
            })?
            .map(Vec3::from)
            .collect();

        let normals = reader
            .read_normals()
            .map(|normals| normals.map(Vec3::from).collect());

        let flat: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..coords.len() as u32).collect(),
        };

        let num_vertices = coords.len() as u32;
        let indices = flat
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .filter(|t| t.iter().all(|&i| i < num_vertices))
            .collect();

        out.push(RenderMesh::new(coords, normals, Some(indices)));
    }

    Ok(out)
}
