//! wgpu rendering context.

pub use self::context::Context;

mod context;
