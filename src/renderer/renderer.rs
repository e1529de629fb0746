use crate::camera::Camera3d;
use crate::color::Srgb8;
use crate::panel::UiFrame;
use crate::scene::SceneNode3d;

/// The drawing surface of the application.
///
/// Sizes are in logical pixels. None of these operations fail: a frame that
/// cannot be drawn is skipped.
pub trait Renderer {
    /// Sets the output size.
    fn set_size(&mut self, width: u32, height: u32);

    /// Sets the ratio between drawing-buffer pixels and logical pixels.
    fn set_pixel_ratio(&mut self, pixel_ratio: f32);

    /// Sets the color the frame is cleared to before drawing the scene.
    fn set_clear_color(&mut self, color: Srgb8);

    /// Draws one frame of `scene` seen from `camera`, with the UI on top.
    fn render(&mut self, scene: &SceneNode3d, camera: &dyn Camera3d, ui: Option<UiFrame>);
}
