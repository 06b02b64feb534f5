//! Face detection models.
//!
//! Coordinates are in the detection capability's working space (pixels of the
//! resampled frame handed to the detector).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A raw detection as reported by the detection capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawDetection {
    /// Left edge x-coordinate
    pub x: f64,
    /// Top edge y-coordinate
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Detector score (cascade stage votes, not a probability)
    pub score: f64,
}

impl RawDetection {
    /// Create a new raw detection.
    pub fn new(x: f64, y: f64, width: f64, height: f64, score: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score,
        }
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when every field is finite and the box has a positive extent.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.score]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// The face region selected for a tick.
///
/// `Copy` on purpose: freezing stores an owned copy, never a reference into
/// the locator's last result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceBox {
    /// Left edge x-coordinate
    pub x: f64,
    /// Top edge y-coordinate
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Score of the detection this box came from
    pub score: f64,
}

impl FaceBox {
    /// Create a new face box.
    pub fn new(x: f64, y: f64, width: f64, height: f64, score: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score,
        }
    }

    /// Right edge x-coordinate.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl From<RawDetection> for FaceBox {
    fn from(det: RawDetection) -> Self {
        Self {
            x: det.x,
            y: det.y,
            width: det.width,
            height: det.height,
            score: det.score,
        }
    }
}
