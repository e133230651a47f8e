//! Color representation used by scheme palettes.
//!
//! This module provides the [`Color`] struct, an 8-bit RGBA color as stored in
//! KDE color-scheme files, and [`ColorParseError`] for errors during parsing.
//!
//! Colors can be parsed from the two syntaxes found in scheme files: the
//! comma-separated `r,g,b[,a]` form and `#`-prefixed hex strings. The module
//! also carries the small amount of color math the panel needs: the integer
//! gray value, the perceptive luminance and the derived "inactive" gray.
//!
//! # Examples
//!
//! ```
//! use novade_scheme_colors::color::Color;
//!
//! let breeze_blue = Color::from_kconfig("61,174,233").unwrap();
//! assert_eq!(breeze_blue, Color::rgb(61, 174, 233));
//! assert_eq!(breeze_blue.to_hex(), "#3daee9");
//!
//! // Dark backgrounds get light text.
//! assert!(Color::rgb(35, 38, 41).perceptive_luminance() < 0.5);
//! ```

use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Error type for color parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid overall format for a hex color string, e.g. a missing leading `#`.
    #[error("Invalid hex color string format: '{0}'. Expected #RGB, #RGBA, #RRGGBB, or #RRGGBBAA.")]
    InvalidHexFormat(String),

    /// An invalid hexadecimal digit was encountered within a component.
    #[error("Invalid hex digit in '{input_str}': {source}")]
    InvalidHexDigit {
        input_str: String,
        #[source]
        source: ParseIntError,
    },

    /// A hex color string has an incorrect number of characters after the `#`.
    #[error("Invalid hex color string length: '{0}'. Expected 3, 4, 6, or 8 characters after '#'.")]
    InvalidHexLength(String),

    /// A comma-separated color is malformed: wrong component count, a
    /// component that is not a number, or a component outside `0..=255`.
    #[error("Invalid color string format: {0}")]
    InvalidFormat(String),
}

/// An RGBA color with 8-bit channels.
///
/// The alpha channel is `255` (fully opaque) unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha (opacity) channel. `0` is fully transparent, `255` fully opaque.
    pub a: u8,
}

impl Color {
    /// Creates a new opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Creates a new color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Returns `true` if the alpha channel is `255`.
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Creates a new `Color` from a hexadecimal string (e.g., "#RRGGBB", "#RGB", "#RRGGBBAA").
    ///
    /// Supported formats:
    /// - `"#RGB"` (e.g., `"#F00"` for red)
    /// - `"#RGBA"` (e.g., `"#F008"` for semi-transparent red)
    /// - `"#RRGGBB"` (e.g., `"#FF0000"` for red)
    /// - `"#RRGGBBAA"` (e.g., `"#FF000080"` for semi-transparent red)
    ///
    /// The parsing is case-insensitive for hex digits.
    ///
    /// # Errors
    ///
    /// Returns a [`ColorParseError`] if the string does not start with `#`, has
    /// an unsupported length, or contains a non-hex digit.
    pub fn from_hex(hex_str: &str) -> Result<Self, ColorParseError> {
        let input = hex_str
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::InvalidHexFormat(hex_str.to_string()))?;
        if !input.is_ascii() {
            return Err(ColorParseError::InvalidHexFormat(hex_str.to_string()));
        }

        let parse_hex_component = |s: &str| {
            // from_str_radix accepts a leading sign.
            if s.starts_with('+') {
                return Err(ColorParseError::InvalidHexFormat(hex_str.to_string()));
            }
            u8::from_str_radix(s, 16).map_err(|e| ColorParseError::InvalidHexDigit {
                input_str: s.to_string(),
                source: e,
            })
        };
        // Short forms repeat each nibble: "#8af" == "#88aaff".
        let parse_nibble = |s: &str| parse_hex_component(s).map(|n| (n << 4) | n);

        match input.len() {
            3 => Ok(Color::rgb(
                parse_nibble(&input[0..1])?,
                parse_nibble(&input[1..2])?,
                parse_nibble(&input[2..3])?,
            )),
            4 => Ok(Color::rgba(
                parse_nibble(&input[0..1])?,
                parse_nibble(&input[1..2])?,
                parse_nibble(&input[2..3])?,
                parse_nibble(&input[3..4])?,
            )),
            6 => Ok(Color::rgb(
                parse_hex_component(&input[0..2])?,
                parse_hex_component(&input[2..4])?,
                parse_hex_component(&input[4..6])?,
            )),
            8 => Ok(Color::rgba(
                parse_hex_component(&input[0..2])?,
                parse_hex_component(&input[2..4])?,
                parse_hex_component(&input[4..6])?,
                parse_hex_component(&input[6..8])?,
            )),
            _ => Err(ColorParseError::InvalidHexLength(hex_str.to_string())),
        }
    }

    /// Parses a color value as written in a KDE config entry.
    ///
    /// Accepts `"r,g,b"` and `"r,g,b,a"` with decimal components in `0..=255`
    /// (whitespace around components is ignored), or any hex form accepted by
    /// [`Color::from_hex`].
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError::InvalidFormat`] for empty input, a wrong
    /// number of components, or a component that is not a `u8`.
    pub fn from_kconfig(value: &str) -> Result<Self, ColorParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ColorParseError::InvalidFormat("empty color value".to_string()));
        }
        if value.starts_with('#') {
            return Color::from_hex(value);
        }

        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(ColorParseError::InvalidFormat(format!(
                "expected 3 or 4 components in '{}', found {}",
                value,
                parts.len()
            )));
        }

        let mut channels = [255u8; 4];
        for (slot, part) in channels.iter_mut().zip(parts.iter()) {
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ColorParseError::InvalidFormat(format!(
                    "invalid component '{}' in '{}'",
                    part, value
                )));
            }
            *slot = part.parse::<u8>().map_err(|e| {
                ColorParseError::InvalidFormat(format!("invalid component '{}' in '{}': {}", part, value, e))
            })?;
        }
        let [r, g, b, a] = channels;
        Ok(Color::rgba(r, g, b, a))
    }

    /// Formats the color in KDE config syntax: `"r,g,b"`, or `"r,g,b,a"` if not opaque.
    pub fn to_kconfig(&self) -> String {
        if self.is_opaque() {
            format!("{},{},{}", self.r, self.g, self.b)
        } else {
            format!("{},{},{},{}", self.r, self.g, self.b, self.a)
        }
    }

    /// Converts this color to a hexadecimal string `"#rrggbb"`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Converts this color to a hexadecimal string `"#rrggbbaa"`.
    pub fn to_hex_with_alpha(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Integer gray value weighted as `(11 r + 16 g + 5 b) / 32`.
    pub fn gray(&self) -> u8 {
        let weighted = u32::from(self.r) * 11 + u32::from(self.g) * 16 + u32::from(self.b) * 5;
        // Max is 255 * 32 / 32, so the quotient always fits.
        (weighted / 32) as u8
    }

    /// Perceptive luminance in `[0.0, 1.0]`: `(0.299 r + 0.587 g + 0.114 b) / 255`.
    pub fn perceptive_luminance(&self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)) / 255.0
    }

    /// Opaque gray used for inactive surfaces derived from this color.
    ///
    /// Gray values up to 200 are lightened by 55 with a floor of 115; brighter
    /// values are darkened by 45.
    pub fn inactive_gray(&self) -> Color {
        let gray = self.gray();
        let shade = if gray <= 200 { (gray + 55).max(115) } else { gray - 45 };
        Color::rgb(shade, shade, shade)
    }
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Color::rgb(0, 0, 0)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parses the same grammar as [`Color::from_kconfig`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_kconfig(s)
    }
}

impl fmt::Display for Color {
    /// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            f.write_str(&self.to_hex())
        } else {
            f.write_str(&self.to_hex_with_alpha())
        }
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_kconfig(&s).map_err(SerdeError::custom)
    }
}
