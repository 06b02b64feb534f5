//! Per-tick face locator.
//!
//! No state survives between calls: each call resamples, detects and selects
//! from scratch.

use metrics::counter;
use tracing::{debug, warn};
use vcam_models::{FaceBox, RawDetection};

use super::capability::FaceDetectionCapability;
use crate::frame::Frame;
use crate::metrics::names;

/// Default minimum score; detections at or below it are discarded.
pub const DEFAULT_MIN_SCORE: f64 = 3.0;

/// Pick the largest-area detection scoring above `min_score`.
///
/// Ties keep the first detection in input order. Malformed detections
/// (non-finite fields, empty extent) never win.
pub fn select_face(detections: &[RawDetection], min_score: f64) -> Option<FaceBox> {
    let mut best: Option<&RawDetection> = None;
    for det in detections {
        if !det.is_well_formed() || det.score <= min_score {
            continue;
        }
        if best.map_or(true, |b| det.area() > b.area()) {
            best = Some(det);
        }
    }
    best.copied().map(FaceBox::from)
}

/// Runs the detection capability and applies the selection policy.
pub struct FaceLocator {
    detector: Box<dyn FaceDetectionCapability>,
    min_score: f64,
}

impl FaceLocator {
    pub fn new(detector: Box<dyn FaceDetectionCapability>, min_score: f64) -> Self {
        Self {
            detector,
            min_score,
        }
    }

    /// Detector working resolution.
    pub fn working_size(&self) -> (u32, u32) {
        self.detector.working_size()
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Resample a frame to the detector's working resolution.
    pub fn to_working(&self, frame: &Frame) -> Frame {
        let (w, h) = self.working_size();
        frame.resampled(w, h)
    }

    /// Detect and select on a frame already at working resolution.
    ///
    /// Detector errors degrade to "no face".
    pub fn locate(&mut self, working: &Frame) -> Option<FaceBox> {
        let detections = match self.detector.detect(working) {
            Ok(detections) => detections,
            Err(e) => {
                counter!(names::DETECTION_FAILURES_TOTAL).increment(1);
                warn!(
                    detector = self.detector.name(),
                    error = %e,
                    "Face detection failed, treating as no face"
                );
                return None;
            }
        };

        let malformed = detections.iter().filter(|d| !d.is_well_formed()).count();
        if malformed > 0 {
            warn!(
                detector = self.detector.name(),
                malformed,
                "Ignoring malformed detections"
            );
        }

        let selected = select_face(&detections, self.min_score);
        debug!(
            candidates = detections.len(),
            selected = selected.is_some(),
            "Face selection"
        );
        if selected.is_some() {
            counter!(names::FACES_DETECTED_TOTAL).increment(1);
        }
        selected
    }

    /// Resample `frame` and locate in one step.
    pub fn locate_in(&mut self, frame: &Frame) -> Option<FaceBox> {
        let working = self.to_working(frame);
        self.locate(&working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::face::capability::MockFaceDetectionCapability;

    fn det(area_w: f64, area_h: f64, score: f64) -> RawDetection {
        RawDetection::new(0.0, 0.0, area_w, area_h, score)
    }

    #[test]
    fn test_selects_largest_area_among_confident() {
        let detections = [
            RawDetection::new(1.0, 1.0, 25.0, 20.0, 2.0),  // area 500, low score
            RawDetection::new(2.0, 2.0, 10.0, 10.0, 5.0),  // area 100
            RawDetection::new(3.0, 3.0, 20.0, 15.0, 4.0),  // area 300
        ];
        let face = select_face(&detections, DEFAULT_MIN_SCORE).unwrap();
        assert_eq!(face, FaceBox::new(3.0, 3.0, 20.0, 15.0, 4.0));
    }

    #[test]
    fn test_score_at_threshold_is_discarded() {
        assert_eq!(select_face(&[det(10.0, 10.0, 3.0)], 3.0), None);
        assert!(select_face(&[det(10.0, 10.0, 3.01)], 3.0).is_some());
    }

    #[test]
    fn test_ties_keep_first() {
        let detections = [
            RawDetection::new(5.0, 0.0, 10.0, 10.0, 4.0),
            RawDetection::new(50.0, 0.0, 20.0, 5.0, 9.0),
        ];
        let face = select_face(&detections, 3.0).unwrap();
        assert_eq!(face.x, 5.0);
    }

    #[test]
    fn test_empty_and_malformed_yield_none() {
        assert_eq!(select_face(&[], 3.0), None);
        assert_eq!(select_face(&[det(f64::NAN, 10.0, 9.0)], 3.0), None);
        assert_eq!(select_face(&[det(-4.0, 10.0, 9.0)], 3.0), None);
    }

    #[test]
    fn test_locate_resamples_to_working_size() {
        let mut mock = MockFaceDetectionCapability::new();
        mock.expect_working_size().return_const((160u32, 120u32));
        mock.expect_name().return_const("mock");
        mock.expect_detect()
            .withf(|image: &Frame| image.dimensions() == (160, 120))
            .times(1)
            .returning(|_| Ok(vec![RawDetection::new(10.0, 10.0, 40.0, 40.0, 6.0)]));

        let mut locator = FaceLocator::new(Box::new(mock), DEFAULT_MIN_SCORE);
        let face = locator.locate_in(&Frame::new(320, 240)).unwrap();
        assert_eq!(face, FaceBox::new(10.0, 10.0, 40.0, 40.0, 6.0));
    }

    #[test]
    fn test_detector_error_degrades_to_no_face() {
        let mut mock = MockFaceDetectionCapability::new();
        mock.expect_working_size().return_const((16u32, 12u32));
        mock.expect_name().return_const("mock");
        mock.expect_detect()
            .returning(|_| Err(MediaError::detection_failed("cascade not loaded")));

        let mut locator = FaceLocator::new(Box::new(mock), DEFAULT_MIN_SCORE);
        assert_eq!(locator.locate_in(&Frame::new(32, 24)), None);
    }
}
