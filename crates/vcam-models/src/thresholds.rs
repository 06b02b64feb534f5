//! Kernel threshold parameters and channel tags.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default threshold for every slider.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// A single RGB channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Byte offset of this channel within an RGBA pixel.
    #[inline]
    pub fn offset(&self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five externally supplied thresholds, each in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Thresholds {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Threshold applied to the subtractive (CMY) intensity.
    pub cmy: u8,
    /// Threshold applied to the HSV value.
    pub hsv: u8,
}

impl Thresholds {
    /// Threshold for a single channel.
    pub fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Same threshold on every slider.
    pub fn uniform(value: u8) -> Self {
        Self {
            red: value,
            green: value,
            blue: value,
            cmy: value,
            hsv: value,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::uniform(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_offsets() {
        assert_eq!(Channel::Red.offset(), 0);
        assert_eq!(Channel::Green.offset(), 1);
        assert_eq!(Channel::Blue.offset(), 2);
    }

    #[test]
    fn test_thresholds_default_to_midpoint() {
        let t = Thresholds::default();
        assert_eq!(t, Thresholds::uniform(128));
    }

    #[test]
    fn test_threshold_by_channel() {
        let t = Thresholds {
            red: 1,
            green: 2,
            blue: 3,
            cmy: 4,
            hsv: 5,
        };
        assert_eq!(t.channel(Channel::Red), 1);
        assert_eq!(t.channel(Channel::Green), 2);
        assert_eq!(t.channel(Channel::Blue), 3);
    }
}
