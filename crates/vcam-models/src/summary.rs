//! Serializable per-tick summary published alongside the output frames.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::command::SnapshotMode;
use crate::detection::FaceBox;
use crate::filter_mode::FaceFilterMode;

/// Face box published for a tick, with the mode it was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceSummary {
    pub face_box: FaceBox,
    /// `live` boxes come from this tick's detection, `frozen` from the snapshot.
    pub source: SnapshotMode,
}

/// Summary of one processed tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TickSummary {
    /// Monotonic tick index, counting processed ticks only.
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
    pub mode: SnapshotMode,
    pub filter_mode: FaceFilterMode,
    /// Fraction of pixels flagged as moving, in `[0, 1]`.
    pub motion_level: f64,
    pub motion_samples: usize,
    pub motion_alert: bool,
    /// False on the motion detector's warm-up tick.
    pub motion_warmed_up: bool,
    pub face: Option<FaceSummary>,
    /// Whether the compositor produced a filtered face region.
    pub filtered_region: bool,
}
