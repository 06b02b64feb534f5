//! Motion sample model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One pixel whose cross-frame channel-sum difference exceeded the motion
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MotionSample {
    pub x: u32,
    pub y: u32,
    /// Unclamped `|dR|+|dG|+|dB|`, in `0..=765`.
    pub strength: u32,
}

impl MotionSample {
    pub fn new(x: u32, y: u32, strength: u32) -> Self {
        Self { x, y, strength }
    }

    /// Strength clamped into a displayable byte.
    #[inline]
    pub fn intensity(&self) -> u8 {
        self.strength.min(255) as u8
    }
}
