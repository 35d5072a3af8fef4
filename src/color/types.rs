use std::fmt;

use serde::Serialize;

use crate::error::ColorError;

/// An 8-bit RGB triple. Out-of-range components cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from wider integers, rejecting anything outside `0..=255`.
    pub fn try_from_components(r: i64, g: i64, b: i64) -> Result<Self, ColorError> {
        match (u8::try_from(r), u8::try_from(g), u8::try_from(b)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self { r, g, b }),
            _ => Err(ColorError::InvalidRange { r, g, b }),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn hex_code(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Hue in degrees, saturation and intensity in `[0, 1]`.
///
/// Intensity here is HSL lightness, `(max + min) / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HsiColor {
    pub h: f64,
    pub s: f64,
    pub i: f64,
}

/// The nine 40° hue sectors, starting at 0°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Azure,
    Blue,
    Violet,
    Purple,
}

impl ColorName {
    pub const ALL: [ColorName; 9] = [
        ColorName::Red,
        ColorName::Orange,
        ColorName::Yellow,
        ColorName::Green,
        ColorName::Cyan,
        ColorName::Azure,
        ColorName::Blue,
        ColorName::Violet,
        ColorName::Purple,
    ];

    pub const SECTOR_DEGREES: f64 = 40.0;

    /// Buckets a hue in degrees. Any finite hue, including negatives and values at or past 360,
    /// wraps onto the circle; non-finite hues fall into the first sector.
    pub fn from_hue(hue: f64) -> Self {
        if !hue.is_finite() {
            return ColorName::Red;
        }
        let sector = (hue / Self::SECTOR_DEGREES).floor() as i64;
        let index = sector.rem_euclid(Self::ALL.len() as i64) as usize;
        Self::ALL[index]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Red => "red",
            ColorName::Orange => "orange",
            ColorName::Yellow => "yellow",
            ColorName::Green => "green",
            ColorName::Cyan => "cyan",
            ColorName::Azure => "azure",
            ColorName::Blue => "blue",
            ColorName::Violet => "violet",
            ColorName::Purple => "purple",
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
