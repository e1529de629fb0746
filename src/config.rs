//! Tunable parameters and command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::color::{self, Srgb8};

/// Default shadow-dot repetitions.
pub const DEFAULT_GRID_SIZE: f32 = 120.0;
/// Default light-dot repetitions.
pub const DEFAULT_LIGHT_REPETITIONS: f32 = 130.0;
/// Default base color, `#ff794d`.
pub const DEFAULT_COLOUR: Srgb8 = [0xff, 0x79, 0x4d];
/// Default light-dot color, `#e5ffe0`.
pub const DEFAULT_LIGHT_COLOUR: Srgb8 = [0xe5, 0xff, 0xe0];
/// Default shadow-dot color, `#8e19b8`.
pub const DEFAULT_SHADOW_COLOUR: Srgb8 = [0x8e, 0x19, 0xb8];
/// Default renderer clear color, `#26132f`.
pub const DEFAULT_CLEAR_COLOR: Srgb8 = [0x26, 0x13, 0x2f];

/// The halftone parameters edited through the debug panel.
///
/// Colors are kept in their authored sRGB form; the uniform slots hold the
/// linear conversion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HalftoneConfig {
    /// Shadow-dot repetitions across the viewport height.
    pub grid_size: f32,
    /// Base surface color.
    pub colour: Srgb8,
    /// Color of the light dots.
    pub light_colour: Srgb8,
    /// Color of the shadow dots.
    pub shadow_colour: Srgb8,
    /// Light-dot repetitions across the viewport height.
    pub light_repetitions: f32,
}

impl Default for HalftoneConfig {
    fn default() -> Self {
        HalftoneConfig {
            grid_size: DEFAULT_GRID_SIZE,
            colour: DEFAULT_COLOUR,
            light_colour: DEFAULT_LIGHT_COLOUR,
            shadow_colour: DEFAULT_SHADOW_COLOUR,
            light_repetitions: DEFAULT_LIGHT_REPETITIONS,
        }
    }
}

/// Renderer-level parameters edited through the debug panel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererParameters {
    /// The color the frame is cleared to.
    pub clear_color: Srgb8,
}

impl Default for RendererParameters {
    fn default() -> Self {
        RendererParameters {
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

fn parse_color(s: &str) -> Result<Srgb8, color::ColorError> {
    color::parse_hex(s)
}

fn parse_samples(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(n @ (1 | 2 | 4 | 8)) => Ok(n),
        _ => Err(format!("expected one of 1, 2, 4, 8, got {s:?}")),
    }
}

/// Command-line options of the demo.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Interactive halftone-shaded 3D scene")]
pub struct Args {
    /// Window title.
    #[arg(long, default_value = "halftone3d")]
    pub title: String,

    /// Initial window width, in logical pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height, in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Model loaded asynchronously into the scene.
    #[arg(long, default_value = "./mxk-logo.glb")]
    pub model: PathBuf,

    /// Disable vertical synchronization.
    #[arg(long)]
    pub no_vsync: bool,

    /// MSAA sample count (1 disables antialiasing).
    #[arg(long, default_value_t = 4, value_parser = parse_samples)]
    pub samples: u32,

    /// Initial shadow-dot repetitions.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    pub grid_size: f32,

    /// Initial light-dot repetitions.
    #[arg(long, default_value_t = DEFAULT_LIGHT_REPETITIONS)]
    pub light_repetitions: f32,

    /// Initial base color.
    #[arg(long, default_value = "#ff794d", value_parser = parse_color)]
    pub colour: Srgb8,

    /// Initial light-dot color.
    #[arg(long, default_value = "#e5ffe0", value_parser = parse_color)]
    pub light_colour: Srgb8,

    /// Initial shadow-dot color.
    #[arg(long, default_value = "#8e19b8", value_parser = parse_color)]
    pub shadow_colour: Srgb8,

    /// Initial clear color.
    #[arg(long, default_value = "#26132f", value_parser = parse_color)]
    pub clear_color: Srgb8,
}

impl Args {
    /// The halftone parameters selected on the command line.
    pub fn halftone_config(&self) -> HalftoneConfig {
        HalftoneConfig {
            grid_size: self.grid_size,
            colour: self.colour,
            light_colour: self.light_colour,
            shadow_colour: self.shadow_colour,
            light_repetitions: self.light_repetitions,
        }
    }

    /// The renderer parameters selected on the command line.
    pub fn renderer_parameters(&self) -> RendererParameters {
        RendererParameters {
            clear_color: self.clear_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let args = Args::parse_from(["halftone3d"]);
        assert_eq!(args.halftone_config(), HalftoneConfig::default());
        assert_eq!(args.renderer_parameters(), RendererParameters::default());
        assert_eq!(args.samples, 4);
        assert!(!args.no_vsync);
    }

    #[test]
    fn overrides_are_parsed() {
        let args = Args::parse_from([
            "halftone3d",
            "--grid-size",
            "50",
            "--colour",
            "#000000",
            "--clear-color",
            "fff",
            "--samples",
            "1",
        ]);
        let config = args.halftone_config();
        assert_eq!(config.grid_size, 50.0);
        assert_eq!(config.colour, [0, 0, 0]);
        assert_eq!(args.renderer_parameters().clear_color, [255, 255, 255]);
        assert_eq!(args.samples, 1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Args::try_parse_from(["halftone3d", "--colour", "#12"]).is_err());
        assert!(Args::try_parse_from(["halftone3d", "--samples", "3"]).is_err());
    }

    #[test]
    fn colour_errors_are_reported_by_the_parser() {
        let err = Args::try_parse_from(["halftone3d", "--shadow-colour", "#zzzzzz"])
            .expect_err("invalid digit");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("invalid hex digit"));
    }
}
