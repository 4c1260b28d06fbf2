//! Colour type and hex parsing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a `#RRGGBB` colour.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid hex colour: '{0}'")]
pub struct ParseColourError(pub String);

/// An opaque RGB colour value.
///
/// Alpha never reaches the accent pipeline: decoded images are flattened to
/// RGB and packed colours are masked to their low 24 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Build a colour from a packed `0xAARRGGBB` or `0xRRGGBB` integer.
    /// Anything above the low 24 bits is ignored.
    pub const fn from_packed(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_packed(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Parse a six-digit hex colour. Any number of leading `#` is accepted.
    pub fn from_hex(s: &str) -> Result<Self, ParseColourError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColourError(s.to_string()));
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (byte(0), byte(2), byte(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self::rgb(r, g, b)),
            _ => Err(ParseColourError(s.to_string())),
        }
    }

    /// Format as lowercase `#rrggbb`, the form the UI tint helpers emit.
    pub fn to_hex_lower(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Multiply every channel by `factor`, truncating toward zero and
    /// clamping to `0..=255`.
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |c: u8| (c as f64 * factor).trunc().clamp(0.0, 255.0) as u8;
        Self::rgb(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Per-channel complement.
    pub const fn inverted(self) -> Self {
        Self::rgb(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Channels as an array, in the layout `image::Rgb` uses.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Colour {
    fn from(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }
}

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Uppercase `#RRGGBB`, the format persisted for fetched colours.
impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
