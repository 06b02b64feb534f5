//! Metrics emitted by the processing core.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the host
//! installs a recorder.

use metrics::{counter, gauge, histogram};

/// Metric names as constants for consistency.
pub mod names {
    // Tick metrics
    pub const TICKS_PROCESSED_TOTAL: &str = "vcam_ticks_processed_total";
    pub const TICKS_SKIPPED_TOTAL: &str = "vcam_ticks_skipped_total";
    pub const TICK_DURATION_SECONDS: &str = "vcam_tick_duration_seconds";

    // Motion metrics
    pub const MOTION_LEVEL: &str = "vcam_motion_level";
    pub const MOTION_SAMPLES: &str = "vcam_motion_samples";
    pub const MOTION_ALERTS_TOTAL: &str = "vcam_motion_alerts_total";

    // Face metrics
    pub const FACES_DETECTED_TOTAL: &str = "vcam_faces_detected_total";
    pub const DETECTION_FAILURES_TOTAL: &str = "vcam_detection_failures_total";

    // Snapshot metrics
    pub const SNAPSHOT_TRANSITIONS_TOTAL: &str = "vcam_snapshot_transitions_total";
    pub const COMMANDS_APPLIED_TOTAL: &str = "vcam_commands_applied_total";
}

/// Record a processed tick.
pub fn record_tick(duration_secs: f64) {
    counter!(names::TICKS_PROCESSED_TOTAL).increment(1);
    histogram!(names::TICK_DURATION_SECONDS).record(duration_secs);
}

/// Record a tick skipped because no frame was available.
pub fn record_tick_skipped(source: &'static str) {
    counter!(names::TICKS_SKIPPED_TOTAL, "source" => source).increment(1);
}

/// Record the motion result of a tick.
pub fn record_motion(level: f64, samples: usize, alert: bool) {
    gauge!(names::MOTION_LEVEL).set(level);
    gauge!(names::MOTION_SAMPLES).set(samples as f64);
    if alert {
        counter!(names::MOTION_ALERTS_TOTAL).increment(1);
    }
}

/// Record a snapshot transition (`froze` / `resumed`).
pub fn record_snapshot_transition(transition: &'static str) {
    counter!(names::SNAPSHOT_TRANSITIONS_TOTAL, "transition" => transition).increment(1);
}

/// Record an applied command.
pub fn record_command(kind: &'static str) {
    counter!(names::COMMANDS_APPLIED_TOTAL, "command" => kind).increment(1);
}
