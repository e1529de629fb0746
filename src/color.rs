//! Colors and their conversions.
//!
//! Colors are authored the way a designer types them, as `#rrggbb` sRGB hex
//! strings, and uploaded to the GPU as linear RGB. [`Color`] always holds
//! linear components in the range [0.0, 1.0]; [`Srgb8`] is the authored,
//! gamma-encoded form kept by the configuration and edited by the panel.

use std::fmt;

pub use rgb::Rgba;

/// The color type used by the renderer. Linear RGBA with f32 components in [0.0, 1.0].
pub type Color = Rgba<f32>;

/// An 8-bit per channel sRGB color, as written in `#rrggbb` notation.
pub type Srgb8 = [u8; 3];

/// Black (0, 0, 0)
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// White (255, 255, 255)
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The string does not have the `#rrggbb` or `#rgb` shape.
    #[error("expected `#rrggbb` or `#rgb`, got {0:?}")]
    Malformed(String),
    /// One of the digits is not hexadecimal.
    #[error("invalid hex digit in {0:?}")]
    InvalidDigit(String),
}

/// Parses a `#rrggbb` (or shorthand `#rgb`) color. The leading `#` is optional.
pub fn parse_hex(s: &str) -> Result<Srgb8, ColorError> {
    let digits = s.trim().trim_start_matches('#');

    let expanded: String = match digits.len() {
        6 => digits.to_owned(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(ColorError::Malformed(s.to_owned())),
    };

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| ColorError::InvalidDigit(s.to_owned()))
    };

    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Formats an sRGB color as `#rrggbb`.
pub fn to_hex(rgb: Srgb8) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Converts one gamma-encoded sRGB component to linear.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// Converts one linear component to gamma-encoded sRGB.
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(0.41666) - 0.055
    }
}

/// Converts an authored sRGB color into the renderer's linear representation.
pub fn from_srgb8(rgb: Srgb8) -> Color {
    let [r, g, b] = rgb.map(|c| srgb_to_linear(c as f32 / 255.0));
    Color::new(r, g, b, 1.0)
}

/// Converts a linear color back into 8-bit sRGB, rounding to the nearest step.
pub fn to_srgb8(color: Color) -> Srgb8 {
    [color.r, color.g, color.b].map(|c| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8)
}

/// Wrapper giving [`Srgb8`] a `#rrggbb` display.
pub struct Hex(pub Srgb8);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex("#ff794d").unwrap(), [0xff, 0x79, 0x4d]);
        assert_eq!(parse_hex("26132f").unwrap(), [0x26, 0x13, 0x2f]);
        assert_eq!(parse_hex("#fa0").unwrap(), [0xff, 0xaa, 0x00]);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(parse_hex("#ff79"), Err(ColorError::Malformed(_))));
        assert!(matches!(
            parse_hex("#gg794d"),
            Err(ColorError::InvalidDigit(_))
        ));
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(to_hex([0x8e, 0x19, 0xb8]), "#8e19b8");
        assert_eq!(Hex([0, 0, 0]).to_string(), "#000000");
    }

    #[test]
    fn srgb_conversion_endpoints() {
        assert_eq!(from_srgb8([0, 0, 0]), BLACK);
        let white = from_srgb8([255, 255, 255]);
        assert!((white.r - 1.0).abs() < 1.0e-5);
        assert!((white.g - 1.0).abs() < 1.0e-5);
        assert!((white.b - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn mid_gray_is_darker_in_linear_space() {
        let gray = from_srgb8([128, 128, 128]);
        assert!((gray.r - 0.2158605).abs() < 1.0e-4);
    }

    #[test]
    fn linear_color_maps_back_to_authored_bytes() {
        let authored = [0xe5, 0xff, 0xe0];
        assert_eq!(to_srgb8(from_srgb8(authored)), authored);
    }
}
