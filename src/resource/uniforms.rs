//! The uniform slots of the halftone material.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glamx::Vec2;

use crate::color::{self, Color, Srgb8};
use crate::config::HalftoneConfig;
use crate::viewport::Viewport;

/// Names of the halftone material uniform slots, as seen by the shader.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UniformName {
    /// Base surface color.
    Color,
    /// Color of the light dots.
    LightColour,
    /// Shadow-dot repetitions.
    GridSize,
    /// Color of the shadow dots.
    ShadowColour,
    /// Light-dot repetitions.
    LightRepetitions,
    /// Drawing-buffer resolution in pixels.
    Resolution,
}

impl UniformName {
    /// Every slot, in declaration order.
    pub const ALL: [UniformName; 6] = [
        UniformName::Color,
        UniformName::LightColour,
        UniformName::GridSize,
        UniformName::ShadowColour,
        UniformName::LightRepetitions,
        UniformName::Resolution,
    ];

    /// The slot name used by the shader program.
    pub fn as_str(self) -> &'static str {
        match self {
            UniformName::Color => "uColor",
            UniformName::LightColour => "uLightColour",
            UniformName::GridSize => "uGridSize",
            UniformName::ShadowColour => "uShadowColour",
            UniformName::LightRepetitions => "uLightRepetitions",
            UniformName::Resolution => "uResolution",
        }
    }
}

impl fmt::Display for UniformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed value of a uniform slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    /// A linear RGB color.
    Color(Color),
    /// A scalar.
    Float(f32),
    /// A two-component vector.
    Vec2(Vec2),
}

/// The uniform table of the halftone material.
///
/// Colors are stored linear, which is what the shader computes with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HalftoneUniforms {
    color: Color,
    light_colour: Color,
    grid_size: f32,
    shadow_colour: Color,
    light_repetitions: f32,
    resolution: Vec2,
}

impl HalftoneUniforms {
    /// Initializes every slot from the tunables and the viewport.
    pub fn from_config(config: &HalftoneConfig, viewport: &Viewport) -> Self {
        HalftoneUniforms {
            color: color::from_srgb8(config.colour),
            light_colour: color::from_srgb8(config.light_colour),
            grid_size: config.grid_size,
            shadow_colour: color::from_srgb8(config.shadow_colour),
            light_repetitions: config.light_repetitions,
            resolution: viewport.resolution(),
        }
    }

    /// Reads a slot.
    pub fn get(&self, name: UniformName) -> UniformValue {
        match name {
            UniformName::Color => UniformValue::Color(self.color),
            UniformName::LightColour => UniformValue::Color(self.light_colour),
            UniformName::GridSize => UniformValue::Float(self.grid_size),
            UniformName::ShadowColour => UniformValue::Color(self.shadow_colour),
            UniformName::LightRepetitions => UniformValue::Float(self.light_repetitions),
            UniformName::Resolution => UniformValue::Vec2(self.resolution),
        }
    }

    /// Sets `uColor` from an authored sRGB color.
    pub fn set_color(&mut self, rgb: Srgb8) {
        self.color = color::from_srgb8(rgb);
    }

    /// Sets `uLightColour` from an authored sRGB color.
    pub fn set_light_colour(&mut self, rgb: Srgb8) {
        self.light_colour = color::from_srgb8(rgb);
    }

    /// Sets `uShadowColour` from an authored sRGB color.
    pub fn set_shadow_colour(&mut self, rgb: Srgb8) {
        self.shadow_colour = color::from_srgb8(rgb);
    }

    /// Sets `uGridSize`.
    pub fn set_grid_size(&mut self, value: f32) {
        self.grid_size = value;
    }

    /// Sets `uLightRepetitions`.
    pub fn set_light_repetitions(&mut self, value: f32) {
        self.light_repetitions = value;
    }

    /// Sets `uResolution`.
    pub fn set_resolution(&mut self, resolution: Vec2) {
        self.resolution = resolution;
    }

    /// The `uColor` slot.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The `uLightColour` slot.
    pub fn light_colour(&self) -> Color {
        self.light_colour
    }

    /// The `uShadowColour` slot.
    pub fn shadow_colour(&self) -> Color {
        self.shadow_colour
    }

    /// The `uGridSize` slot.
    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// The `uLightRepetitions` slot.
    pub fn light_repetitions(&self) -> f32 {
        self.light_repetitions
    }

    /// The `uResolution` slot.
    pub fn resolution(&self) -> Vec2 {
        self.resolution
    }

    /// Packs the slots for upload to the GPU.
    pub fn to_block(&self) -> HalftoneUniformBlock {
        let rgba = |c: Color| [c.r, c.g, c.b, 1.0];

        HalftoneUniformBlock {
            color: rgba(self.color),
            shadow_colour: rgba(self.shadow_colour),
            light_colour: rgba(self.light_colour),
            resolution: self.resolution.into(),
            grid_size: self.grid_size,
            light_repetitions: self.light_repetitions,
        }
    }
}

/// GPU layout of [`HalftoneUniforms`], matching `HalftoneUniforms` in `halftone.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct HalftoneUniformBlock {
    pub color: [f32; 4],
    pub shadow_colour: [f32; 4],
    pub light_colour: [f32; 4],
    pub resolution: [f32; 2],
    pub grid_size: f32,
    pub light_repetitions: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniforms() -> HalftoneUniforms {
        HalftoneUniforms::from_config(&HalftoneConfig::default(), &Viewport::new(800, 600, 2.0))
    }

    #[test]
    fn slots_mirror_the_config() {
        let u = uniforms();
        assert_eq!(u.get(UniformName::GridSize), UniformValue::Float(120.0));
        assert_eq!(u.get(UniformName::LightRepetitions), UniformValue::Float(130.0));
        assert_eq!(
            u.get(UniformName::Color),
            UniformValue::Color(color::from_srgb8([0xff, 0x79, 0x4d]))
        );
        assert_eq!(
            u.get(UniformName::Resolution),
            UniformValue::Vec2(Vec2::new(1600.0, 1200.0))
        );
    }

    #[test]
    fn block_is_std140_sized() {
        assert_eq!(std::mem::size_of::<HalftoneUniformBlock>(), 64);

        let mut u = uniforms();
        u.set_grid_size(50.0);
        let block = u.to_block();
        assert_eq!(block.grid_size, 50.0);
        assert_eq!(block.resolution, [1600.0, 1200.0]);
        assert_eq!(block.color[3], 1.0);
    }
}
