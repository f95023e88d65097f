use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Emotional state driving scene selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Emotion {
    Calm,
    Stressed,
    Upbeat,
    Low,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Calm,
        Emotion::Stressed,
        Emotion::Upbeat,
        Emotion::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Calm => "Calm",
            Emotion::Stressed => "Stressed",
            Emotion::Upbeat => "Upbeat",
            Emotion::Low => "Low",
        }
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Calm
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown emotion label: {0:?}")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|emotion| emotion.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

impl TryFrom<String> for Emotion {
    type Error = UnknownEmotion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    /// Largest value a packed 24-bit color can take.
    pub const MAX_PACKED: u32 = 0xFF_FF_FF;

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the color as `(R << 16) | (G << 8) | B`, the encoding the
    /// device provider expects for `colorRgb`.
    pub fn pack(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Inverse of [`RgbColor::pack`]. Returns `None` for values that don't
    /// fit in 24 bits.
    pub fn from_packed(value: u32) -> Option<Self> {
        if value > Self::MAX_PACKED {
            return None;
        }
        Some(Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        })
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub name: String,
    pub emotion: Emotion,
    pub color: RgbColor,
    /// Percentage, 0 to 100.
    pub brightness: u8,
    /// Carried with the scene but never sent to the device.
    pub effect: String,
}

impl Scene {
    pub fn new(
        name: impl Into<String>,
        emotion: Emotion,
        color: RgbColor,
        brightness: u8,
        effect: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            emotion,
            color,
            brightness,
            effect: effect.into(),
        }
    }
}
