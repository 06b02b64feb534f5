//! Replayed face detections.
//!
//! A replay file is a JSON object mapping detection call index to the
//! detections that call returns:
//!
//! ```json
//! { "0": [{ "x": 40, "y": 30, "width": 50, "height": 50, "score": 6 }],
//!   "4": [] }
//! ```
//!
//! Calls without an entry return no detections. Only live ticks call the
//! detector, so indices count live ticks, not all ticks.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;
use vcam_media::{FaceDetectionCapability, Frame, MediaResult};
use vcam_models::RawDetection;

use crate::error::{WorkerError, WorkerResult};

/// Detector that plays back recorded detections.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    working_size: (u32, u32),
    script: BTreeMap<u64, Vec<RawDetection>>,
    calls: u64,
}

impl ReplayDetector {
    pub fn new(working_size: (u32, u32), script: BTreeMap<u64, Vec<RawDetection>>) -> Self {
        Self {
            working_size,
            script,
            calls: 0,
        }
    }

    /// Load a replay file.
    pub fn load(path: impl AsRef<Path>, working_size: (u32, u32)) -> WorkerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| WorkerError::replay_failed(path, e.to_string()))?;
        let script: BTreeMap<u64, Vec<RawDetection>> = serde_json::from_str(&text)
            .map_err(|e| WorkerError::replay_failed(path, e.to_string()))?;

        info!(
            path = %path.display(),
            entries = script.len(),
            "Loaded detection replay"
        );
        Ok(Self::new(working_size, script))
    }

    /// Number of detector calls so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl FaceDetectionCapability for ReplayDetector {
    fn working_size(&self) -> (u32, u32) {
        self.working_size
    }

    fn detect(&mut self, _image: &Frame) -> MediaResult<Vec<RawDetection>> {
        let detections = self.script.get(&self.calls).cloned().unwrap_or_default();
        self.calls += 1;
        Ok(detections)
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}
