//! Color type and the temperature palette.
//!
//! Colors are 8-bit RGBA. The palette is the diverging blue-to-red scheme
//! (ColorBrewer RdYlBu, reversed) used for temperature maps.

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a `#RRGGBB` or `#RRGGBBAA` hex string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || Error::Config {
            line: 0,
            message: format!("invalid color '{hex}'"),
        };

        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Format as an uppercase `#RRGGBB` string (alpha is dropped).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors in RGB space.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;

        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

/// The ten temperature colors, coldest first.
pub const TEMPERATURE_PALETTE: [Rgba; 10] = [
    Rgba::rgb(0x45, 0x75, 0xB4),
    Rgba::rgb(0x74, 0xAD, 0xD1),
    Rgba::rgb(0xAB, 0xD9, 0xE9),
    Rgba::rgb(0xE0, 0xF3, 0xF8),
    Rgba::rgb(0xFF, 0xFF, 0xBF),
    Rgba::rgb(0xFE, 0xE0, 0x90),
    Rgba::rgb(0xFD, 0xAE, 0x61),
    Rgba::rgb(0xF4, 0x6D, 0x43),
    Rgba::rgb(0xD7, 0x30, 0x27),
    Rgba::rgb(0xA5, 0x00, 0x26),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn test_rgba_lerp() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid, Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_lerp_boundaries() {
        let black = Rgba::BLACK;
        let white = Rgba::WHITE;

        assert_eq!(black.lerp(white, 0.0), black);
        assert_eq!(black.lerp(white, 1.0), white);

        // t clamped to [0, 1]
        assert_eq!(black.lerp(white, -0.5), black);
        assert_eq!(black.lerp(white, 1.5), white);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#4575B4").unwrap(), Rgba::rgb(0x45, 0x75, 0xB4));
        assert_eq!(Rgba::from_hex("a50026").unwrap(), Rgba::rgb(0xA5, 0x00, 0x26));
        assert_eq!(Rgba::from_hex("#00000080").unwrap(), Rgba::new(0, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Rgba::from_hex("#12345").is_err());
        assert!(Rgba::from_hex("#GGGGGG").is_err());
        assert!(Rgba::from_hex("").is_err());
        assert!(Rgba::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(TEMPERATURE_PALETTE[0].to_hex(), "#4575B4");
        assert_eq!(TEMPERATURE_PALETTE[9].to_hex(), "#A50026");
    }

    #[test]
    fn test_palette_is_distinct() {
        for (i, a) in TEMPERATURE_PALETTE.iter().enumerate() {
            for b in &TEMPERATURE_PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
