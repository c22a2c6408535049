//! RGB colors, hex parsing and the fallback palette.

use std::fmt;
use std::str::FromStr;

use crate::util::{SymScanError, SymScanResult};

/// 8-bit RGB color. Channel order is red, green, blue everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Fallback palette indexed by `template_index % PALETTE.len()`.
pub const PALETTE: [Color; 6] = [
    Color::rgb(255, 0, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 255, 0),
    Color::rgb(255, 0, 255),
    Color::rgb(0, 255, 255),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Validates channel values given as wider integers.
    pub fn from_channels(r: u32, g: u32, b: u32) -> SymScanResult<Self> {
        let cast = |v: u32| {
            u8::try_from(v)
                .map_err(|_| SymScanError::validation(format!("color channel {v} exceeds 255")))
        };
        Ok(Self::rgb(cast(r)?, cast(g)?, cast(b)?))
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb` or `rrggbb`.
    ///
    /// The short form doubles each digit, so `#f80` is `#ff8800`.
    pub fn from_hex(text: &str) -> SymScanResult<Self> {
        let digits = text.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SymScanError::validation(format!(
                "color {text:?} is not hexadecimal"
            )));
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).unwrap_or(0);
        match digits.len() {
            3 => Ok(Self::rgb(nibble(0) * 17, nibble(1) * 17, nibble(2) * 17)),
            6 => {
                let byte = |i: usize| nibble(i) * 16 + nibble(i + 1);
                Ok(Self::rgb(byte(0), byte(2), byte(4)))
            }
            n => Err(SymScanError::validation(format!(
                "color {text:?} has {n} digits, expected 3 or 6"
            ))),
        }
    }

    /// Palette color for a template index.
    pub fn palette(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    /// Returns `[r, g, b]`.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = SymScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
