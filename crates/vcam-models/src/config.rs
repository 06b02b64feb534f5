//! Configuration for the per-tick processing pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::{ModelError, ModelResult};

/// Input used for the kernel gallery tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum GallerySource {
    /// Always the frame acquired this tick.
    #[default]
    LiveFrame,
    /// The retained snapshot while frozen, the live frame otherwise.
    SnapshotWhenFrozen,
}

impl fmt::Display for GallerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GallerySource::LiveFrame => write!(f, "live_frame"),
            GallerySource::SnapshotWhenFrozen => write!(f, "snapshot_when_frozen"),
        }
    }
}

impl FromStr for GallerySource {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live_frame" | "live" => Ok(GallerySource::LiveFrame),
            "snapshot_when_frozen" | "snapshot" => Ok(GallerySource::SnapshotWhenFrozen),
            _ => Err(ModelError::UnknownGallerySource(s.to_string())),
        }
    }
}

/// Configuration for the processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct PipelineConfig {
    // === Capture ===
    /// Fixed capture width frames are expected at (default: 320)
    #[validate(range(min = 1, max = 8192))]
    pub capture_width: u32,

    /// Fixed capture height (default: 240)
    #[validate(range(min = 1, max = 8192))]
    pub capture_height: u32,

    // === Face Detection ===
    /// Detector working width; snapshots are stored at this size (default: 160)
    #[validate(range(min = 1, max = 4096))]
    pub working_width: u32,

    /// Detector working height (default: 120)
    #[validate(range(min = 1, max = 4096))]
    pub working_height: u32,

    /// Detections scoring at or below this are discarded (default: 3.0)
    pub min_face_score: f64,

    // === Motion ===
    /// Channel-sum difference a pixel must exceed to count as motion (default: 50)
    #[validate(range(max = 765))]
    pub motion_threshold: u32,

    /// Fraction of moving pixels that raises the motion alert (default: 0.05)
    #[validate(range(min = 0.0, max = 1.0))]
    pub motion_alert_level: f64,

    // === Compositor ===
    /// Box blur radius in pixels (default: 4)
    #[validate(range(max = 64))]
    pub blur_radius: u32,

    /// Pixelate block edge in pixels (default: 5)
    #[validate(range(min = 1, max = 256))]
    pub pixelate_block: u32,

    // === Gallery ===
    pub gallery_source: GallerySource,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capture_width: 320,
            capture_height: 240,

            working_width: 160,
            working_height: 120,
            min_face_score: 3.0,

            motion_threshold: 50,
            motion_alert_level: 0.05,

            blur_radius: 4,
            pixelate_block: 5,

            gallery_source: GallerySource::LiveFrame,
        }
    }
}

impl PipelineConfig {
    /// Validate field ranges.
    pub fn validated(self) -> ModelResult<Self> {
        self.validate()?;
        if !self.min_face_score.is_finite() {
            return Err(ModelError::invalid_config("min_face_score must be finite"));
        }
        Ok(self)
    }

    /// Capture resolution as `(width, height)`.
    pub fn capture_size(&self) -> (u32, u32) {
        (self.capture_width, self.capture_height)
    }

    /// Detector working resolution as `(width, height)`.
    pub fn working_size(&self) -> (u32, u32) {
        (self.working_width, self.working_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default().validated().unwrap();
        assert_eq!(config.capture_size(), (320, 240));
        assert_eq!(config.working_size(), (160, 120));
        assert_eq!(config.motion_threshold, 50);
        assert_eq!(config.blur_radius, 4);
        assert_eq!(config.pixelate_block, 5);
    }

    #[test]
    fn test_zero_block_rejected() {
        let config = PipelineConfig {
            pixelate_block: 0,
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_alert_level_out_of_range_rejected() {
        let config = PipelineConfig {
            motion_alert_level: 1.5,
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let config = PipelineConfig {
            min_face_score: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validated(), Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn test_gallery_source_parse() {
        assert_eq!("live".parse::<GallerySource>().unwrap(), GallerySource::LiveFrame);
        assert_eq!(
            "snapshot_when_frozen".parse::<GallerySource>().unwrap(),
            GallerySource::SnapshotWhenFrozen
        );
        assert!("other".parse::<GallerySource>().is_err());
    }
}
