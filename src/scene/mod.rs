//! Everything related to the scene graph.

pub use self::object3d::{Object3d, ObjectId};
pub use self::scene_node3d::{DrawItem, SceneNode3d, SceneNodeData3d};
pub use self::transform::{Euler, Transform};

mod object3d;
mod scene_node3d;
mod transform;
