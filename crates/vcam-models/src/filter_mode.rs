//! Face filter modes applied to a frozen face region.
//!
//! - `None`: passthrough (the box is only outlined)
//! - `Grayscale`: boosted luminance
//! - `Blur`: fixed-radius box blur
//! - `Hsv`: hue/saturation/value visualization
//! - `Pixelate`: fixed block mosaic

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Filter applied by the face-region compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum FaceFilterMode {
    #[default]
    None,
    Grayscale,
    Blur,
    Hsv,
    Pixelate,
}

impl FaceFilterMode {
    /// All modes, indexed by their selection key.
    pub const ALL: &'static [FaceFilterMode] = &[
        FaceFilterMode::None,
        FaceFilterMode::Grayscale,
        FaceFilterMode::Blur,
        FaceFilterMode::Hsv,
        FaceFilterMode::Pixelate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceFilterMode::None => "none",
            FaceFilterMode::Grayscale => "grayscale",
            FaceFilterMode::Blur => "blur",
            FaceFilterMode::Hsv => "hsv",
            FaceFilterMode::Pixelate => "pixelate",
        }
    }

    /// Selection key (`0`..`4`).
    pub fn key(&self) -> u8 {
        match self {
            FaceFilterMode::None => 0,
            FaceFilterMode::Grayscale => 1,
            FaceFilterMode::Blur => 2,
            FaceFilterMode::Hsv => 3,
            FaceFilterMode::Pixelate => 4,
        }
    }

    /// Mode for a selection key, if the key is bound.
    pub fn from_key(key: u8) -> Option<Self> {
        Self::ALL.get(key as usize).copied()
    }
}

impl fmt::Display for FaceFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FaceFilterMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "0" => Ok(FaceFilterMode::None),
            "grayscale" | "gray" | "1" => Ok(FaceFilterMode::Grayscale),
            "blur" | "2" => Ok(FaceFilterMode::Blur),
            "hsv" | "3" => Ok(FaceFilterMode::Hsv),
            "pixelate" | "4" => Ok(FaceFilterMode::Pixelate),
            _ => Err(ModelError::UnknownFilterMode(s.to_string())),
        }
    }
}
