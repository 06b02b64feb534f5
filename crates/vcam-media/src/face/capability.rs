//! Host-provided face detection capability.
//!
//! The detector itself is opaque to the core. Implementations receive a frame
//! already resampled to their working size and report boxes in that space.

use vcam_models::RawDetection;

use crate::error::MediaResult;
use crate::frame::Frame;

/// Face detection capability.
#[cfg_attr(test, mockall::automock)]
pub trait FaceDetectionCapability: Send {
    /// Fixed resolution the detector works at, `(width, height)`.
    fn working_size(&self) -> (u32, u32);

    /// Detect faces in a frame of [`working_size`](Self::working_size).
    ///
    /// Results are returned in the detector's native order; selection ties
    /// are broken by this order.
    fn detect(&mut self, image: &Frame) -> MediaResult<Vec<RawDetection>>;

    /// Detector name for logging.
    fn name(&self) -> &'static str;
}

/// Detector that never finds anything.
#[derive(Debug, Clone)]
pub struct NullDetector {
    working_size: (u32, u32),
}

impl NullDetector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            working_size: (width, height),
        }
    }
}

impl Default for NullDetector {
    fn default() -> Self {
        Self::new(160, 120)
    }
}

impl FaceDetectionCapability for NullDetector {
    fn working_size(&self) -> (u32, u32) {
        self.working_size
    }

    fn detect(&mut self, _image: &Frame) -> MediaResult<Vec<RawDetection>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
