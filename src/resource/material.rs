//! Shader materials.

use std::cell::RefCell;
use std::rc::Rc;

use crate::resource::uniforms::HalftoneUniforms;

/// WGSL source of the halftone program (vertex and fragment entry points).
pub static HALFTONE_SRC: &str = include_str!("../builtin/halftone.wgsl");

/// A vertex + fragment program pair with its uniform table.
///
/// One instance is shared by every object of the scene so that color and
/// lighting stay consistent across them. The GPU pipeline is built from it
/// by the renderer; uniform writes are picked up by the next draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderMaterial {
    /// Program source.
    pub source: &'static str,
    /// Vertex entry point.
    pub vertex_entry: &'static str,
    /// Fragment entry point.
    pub fragment_entry: &'static str,
    /// The uniform table.
    pub uniforms: HalftoneUniforms,
}

impl ShaderMaterial {
    /// The halftone material with the given initial uniforms.
    pub fn halftone(uniforms: HalftoneUniforms) -> ShaderMaterial {
        ShaderMaterial {
            source: HALFTONE_SRC,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            uniforms,
        }
    }
}

/// Shared, mutable handle to a material.
pub type MaterialHandle = Rc<RefCell<ShaderMaterial>>;

/// Wraps a material into a shareable handle.
pub fn shared(material: ShaderMaterial) -> MaterialHandle {
    Rc::new(RefCell::new(material))
}
