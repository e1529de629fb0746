//! Renderers: the abstract drawing surface and its wgpu implementation.

pub use self::egui_renderer::EguiRenderer;
pub use self::renderer::Renderer;
pub use self::scene_target::{drawing_buffer_size, BlitPass, SceneBuffer, SceneTarget};
pub use self::wgpu_renderer::{RendererSetup, WgpuRenderer};

mod egui_renderer;
mod renderer;
mod scene_target;
mod wgpu_renderer;
