//! Viewport size state.

use glamx::Vec2;

/// Upper bound of the pixel ratio used for rendering, to bound the GPU cost
/// on high-density displays.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Size of the drawing area, in logical pixels, with its (clamped) pixel ratio.
///
/// This is recomputed on every resize and drives the camera aspect ratio, the
/// renderer size, and the `uResolution` uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    device_pixel_ratio: f32,
    pixel_ratio: f32,
}

impl Viewport {
    /// Creates the viewport state from the window's logical size and the
    /// device pixel ratio. The ratio is clamped to [`MAX_PIXEL_RATIO`].
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Viewport {
            width,
            height,
            device_pixel_ratio,
            pixel_ratio: device_pixel_ratio.min(MAX_PIXEL_RATIO),
        }
    }

    /// Creates the viewport state from a physical window size and its scale factor.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let logical_w = (width as f64 / scale_factor).round() as u32;
        let logical_h = (height as f64 / scale_factor).round() as u32;
        Viewport::new(logical_w, logical_h, scale_factor as f32)
    }

    /// The logical width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The logical height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The unclamped ratio between physical and logical pixels of the display.
    #[inline]
    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// The clamped pixel ratio.
    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Width over height. A zero height (minimized window) yields 1.0.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// The drawing-buffer resolution fed to the shader: size times pixel ratio.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.pixel_ratio,
            self.height as f32 * self.pixel_ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_clamped() {
        assert_eq!(Viewport::new(800, 600, 3.0).pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(800, 600, 3.0).device_pixel_ratio(), 3.0);
        assert_eq!(Viewport::new(800, 600, 1.5).pixel_ratio(), 1.5);
    }

    #[test]
    fn resolution_scales_with_clamped_ratio() {
        let vp = Viewport::new(800, 600, 2.0);
        assert_eq!(vp.resolution(), Vec2::new(1600.0, 1200.0));

        let vp = Viewport::new(1024, 768, 4.0);
        assert_eq!(vp.resolution(), Vec2::new(2048.0, 1536.0));

        let vp = Viewport::new(640, 480, 1.0);
        assert_eq!(vp.resolution(), Vec2::new(640.0, 480.0));
    }

    #[test]
    fn physical_size_is_converted_to_logical() {
        let vp = Viewport::from_physical(1600, 1200, 2.0);
        assert_eq!((vp.width(), vp.height()), (800, 600));
        assert_eq!(vp.resolution(), Vec2::new(1600.0, 1200.0));
    }

    #[test]
    fn degenerate_height_has_unit_aspect() {
        assert_eq!(Viewport::new(800, 0, 1.0).aspect(), 1.0);
        assert!((Viewport::new(800, 600, 1.0).aspect() - 4.0 / 3.0).abs() < 1.0e-6);
    }
}
