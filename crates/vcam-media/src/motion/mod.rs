//! Two-frame motion differencing.
//!
//! The detector keeps one previous frame. Each call compares the new frame to
//! it pixel by pixel, flags pixels whose channel-sum difference exceeds the
//! threshold, then replaces the cached frame. The first call only primes the
//! cache and reports zero motion.
//!
//! Calling [`MotionDetector::detect`] twice for the same tick compares the
//! frame against itself on the second call; the pipeline calls it exactly
//! once per processed tick.

pub mod heatmap;

use tracing::{debug, warn};
use vcam_models::MotionSample;

use crate::frame::{Frame, CHANNELS};

/// Default channel-sum difference a pixel must exceed.
pub const DEFAULT_MOTION_THRESHOLD: u32 = 50;

/// Default moving-pixel fraction that raises the alert.
pub const DEFAULT_ALERT_LEVEL: f64 = 0.05;

/// Result of one detector invocation. Samples stay in the detector's buffer,
/// see [`MotionDetector::samples`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionReport {
    /// Fraction of pixels flagged, in `[0, 1]`.
    pub level: f64,
    pub sample_count: usize,
    /// False when this call only primed the previous-frame cache.
    pub warmed_up: bool,
}

impl MotionReport {
    /// Report for a warm-up call.
    pub fn warm_up() -> Self {
        Self {
            level: 0.0,
            sample_count: 0,
            warmed_up: false,
        }
    }

    /// Whether enough of the frame moved to raise the motion alert.
    pub fn is_alert(&self, alert_level: f64) -> bool {
        self.level > alert_level
    }
}

/// Frame-diff motion detector with a reusable sample buffer.
pub struct MotionDetector {
    /// Previous frame for differencing.
    previous: Option<Frame>,
    /// Minimum channel-sum change to count as motion (0-765).
    threshold: u32,
    /// Samples from the last comparison; cleared, not reallocated, per call.
    samples: Vec<MotionSample>,
}

impl MotionDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            previous: None,
            threshold,
            samples: Vec::new(),
        }
    }

    /// Samples produced by the last call.
    pub fn samples(&self) -> &[MotionSample] {
        &self.samples
    }

    /// Compare `frame` against the cached previous frame, then cache `frame`.
    pub fn detect(&mut self, frame: &Frame) -> MotionReport {
        self.samples.clear();

        let previous = match self.previous.as_mut() {
            Some(prev) if prev.dimensions() == frame.dimensions() => prev,
            Some(prev) => {
                warn!(
                    previous = ?prev.dimensions(),
                    current = ?frame.dimensions(),
                    "Frame size changed, restarting motion warm-up"
                );
                self.previous = Some(frame.clone());
                return MotionReport::warm_up();
            }
            None => {
                debug!("Priming motion detector");
                self.previous = Some(frame.clone());
                return MotionReport::warm_up();
            }
        };

        let width = frame.width() as usize;
        let pixel_count = frame.pixel_count();
        // Buffer is empty here, so this only allocates until it has held a full frame.
        self.samples.reserve(pixel_count);

        for (i, (cur, prev)) in frame
            .as_raw()
            .chunks_exact(CHANNELS)
            .zip(previous.as_raw().chunks_exact(CHANNELS))
            .enumerate()
        {
            let diff = cur[0].abs_diff(prev[0]) as u32
                + cur[1].abs_diff(prev[1]) as u32
                + cur[2].abs_diff(prev[2]) as u32;
            if diff > self.threshold {
                self.samples.push(MotionSample::new(
                    (i % width) as u32,
                    (i / width) as u32,
                    diff,
                ));
            }
        }

        previous.copy_from(frame);

        let level = if pixel_count == 0 {
            0.0
        } else {
            self.samples.len() as f64 / pixel_count as f64
        };

        MotionReport {
            level,
            sample_count: self.samples.len(),
            warmed_up: true,
        }
    }
}

impl Default for MotionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MOTION_THRESHOLD)
    }
}
