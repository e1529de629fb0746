//! Built-in materials.

pub use self::halftone_material::HalftoneMaterial;

mod halftone_material;
