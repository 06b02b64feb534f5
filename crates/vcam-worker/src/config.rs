//! Worker configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use vcam_models::{GallerySource, PipelineConfig, Thresholds};

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory of still images played back as the camera feed
    pub input_dir: PathBuf,
    /// Where frames, tick summaries and metrics are written
    pub output_dir: PathBuf,
    /// Restart the image sequence when it runs out
    pub loop_input: bool,
    /// Time between ticks
    pub tick_interval: Duration,
    /// Write frame images every N processed ticks
    pub publish_every: u64,
    /// Stop after this many processed ticks (0 = unbounded)
    pub max_ticks: u64,
    /// Stop after this many consecutive skipped ticks (0 = never)
    pub idle_tick_limit: u64,
    /// Detections to replay instead of running a detector
    pub replay_file: Option<PathBuf>,
    /// Initial slider values
    pub thresholds: Thresholds,
    /// Processing core settings
    pub pipeline: PipelineConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./frames"),
            output_dir: PathBuf::from("./vcam-out"),
            loop_input: false,
            tick_interval: Duration::from_millis(33), // ~30 fps
            publish_every: 30,
            max_ticks: 0,
            idle_tick_limit: 30,
            replay_file: None,
            thresholds: Thresholds::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup. Unset or unparsable values fall
    /// back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let pipeline_defaults = PipelineConfig::default();
        let default_threshold = Thresholds::default();

        let pipeline = PipelineConfig {
            capture_width: parse_var(&lookup, "VCAM_CAPTURE_WIDTH")
                .unwrap_or(pipeline_defaults.capture_width),
            capture_height: parse_var(&lookup, "VCAM_CAPTURE_HEIGHT")
                .unwrap_or(pipeline_defaults.capture_height),
            working_width: parse_var(&lookup, "VCAM_WORKING_WIDTH")
                .unwrap_or(pipeline_defaults.working_width),
            working_height: parse_var(&lookup, "VCAM_WORKING_HEIGHT")
                .unwrap_or(pipeline_defaults.working_height),
            min_face_score: parse_var(&lookup, "VCAM_MIN_FACE_SCORE")
                .unwrap_or(pipeline_defaults.min_face_score),
            motion_threshold: parse_var(&lookup, "VCAM_MOTION_THRESHOLD")
                .unwrap_or(pipeline_defaults.motion_threshold),
            motion_alert_level: parse_var(&lookup, "VCAM_MOTION_ALERT_LEVEL")
                .unwrap_or(pipeline_defaults.motion_alert_level),
            blur_radius: parse_var(&lookup, "VCAM_BLUR_RADIUS")
                .unwrap_or(pipeline_defaults.blur_radius),
            pixelate_block: parse_var(&lookup, "VCAM_PIXELATE_BLOCK")
                .unwrap_or(pipeline_defaults.pixelate_block),
            gallery_source: parse_var::<GallerySource, _>(&lookup, "VCAM_GALLERY_SOURCE")
                .unwrap_or(pipeline_defaults.gallery_source),
        };

        let thresholds = Thresholds {
            red: parse_var(&lookup, "VCAM_THRESHOLD_RED").unwrap_or(default_threshold.red),
            green: parse_var(&lookup, "VCAM_THRESHOLD_GREEN").unwrap_or(default_threshold.green),
            blue: parse_var(&lookup, "VCAM_THRESHOLD_BLUE").unwrap_or(default_threshold.blue),
            cmy: parse_var(&lookup, "VCAM_THRESHOLD_CMY").unwrap_or(default_threshold.cmy),
            hsv: parse_var(&lookup, "VCAM_THRESHOLD_HSV").unwrap_or(default_threshold.hsv),
        };

        Self {
            input_dir: lookup("VCAM_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: lookup("VCAM_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            loop_input: lookup("VCAM_LOOP")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.loop_input),
            tick_interval: parse_var(&lookup, "VCAM_TICK_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            publish_every: parse_var(&lookup, "VCAM_PUBLISH_EVERY")
                .unwrap_or(defaults.publish_every),
            max_ticks: parse_var(&lookup, "VCAM_MAX_TICKS").unwrap_or(defaults.max_ticks),
            idle_tick_limit: parse_var(&lookup, "VCAM_IDLE_TICK_LIMIT")
                .unwrap_or(defaults.idle_tick_limit),
            replay_file: lookup("VCAM_REPLAY_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            thresholds,
            pipeline,
        }
    }

    /// Reject settings the runner cannot work with.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.publish_every == 0 {
            return Err(WorkerError::config_error("VCAM_PUBLISH_EVERY must be at least 1"));
        }
        if self.tick_interval.is_zero() {
            return Err(WorkerError::config_error("VCAM_TICK_INTERVAL_MS must be at least 1"));
        }
        self.pipeline.clone().validated()?;
        Ok(())
    }
}

/// Parse `key` through `lookup`, ignoring values that do not parse.
fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> WorkerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.tick_interval, Duration::from_millis(33));
        assert_eq!(config.publish_every, 30);
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.pipeline.capture_size(), (320, 240));
        assert!(config.replay_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("VCAM_INPUT_DIR", "/data/cam"),
            ("VCAM_LOOP", "true"),
            ("VCAM_TICK_INTERVAL_MS", "100"),
            ("VCAM_THRESHOLD_HSV", "200"),
            ("VCAM_GALLERY_SOURCE", "snapshot_when_frozen"),
            ("VCAM_REPLAY_FILE", "faces.json"),
        ]);
        assert_eq!(config.input_dir, PathBuf::from("/data/cam"));
        assert!(config.loop_input);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.thresholds.hsv, 200);
        assert_eq!(config.pipeline.gallery_source, GallerySource::SnapshotWhenFrozen);
        assert_eq!(config.replay_file, Some(PathBuf::from("faces.json")));
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config_from(&[("VCAM_THRESHOLD_RED", "300"), ("VCAM_PUBLISH_EVERY", "x")]);
        assert_eq!(config.thresholds.red, 128);
        assert_eq!(config.publish_every, 30);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = config_from(&[("VCAM_PUBLISH_EVERY", "0")]);
        assert!(matches!(config.validate(), Err(WorkerError::ConfigError(_))));

        let config = config_from(&[("VCAM_PIXELATE_BLOCK", "0")]);
        assert!(matches!(config.validate(), Err(WorkerError::Model(_))));
    }
}
