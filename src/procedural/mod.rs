//! Procedural geometry generation.

pub use self::render_mesh::RenderMesh;
pub use self::sphere::{sphere, unit_sphere};
pub use self::torus_knot::{torus_knot, TorusKnot};

mod render_mesh;
mod sphere;
mod torus_knot;
pub mod utils;
