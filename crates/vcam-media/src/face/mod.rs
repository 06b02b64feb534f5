//! Face location: the injected detection capability, selection policy and
//! the annotation published for presentation layers.

pub mod capability;
pub mod locator;

pub use capability::{FaceDetectionCapability, NullDetector};
pub use locator::{select_face, FaceLocator, DEFAULT_MIN_SCORE};

use serde::{Deserialize, Serialize};
use vcam_models::{FaceBox, SnapshotMode};

/// Caption shown next to a located face.
pub const FACE_LABEL: &str = "Face Detected";

/// How a presentation layer should outline the face box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStyle {
    /// Box from the current tick's detection.
    Live,
    /// Box retained in the snapshot.
    Frozen,
}

impl AnnotationStyle {
    /// Outline color, RGBA.
    pub fn color(&self) -> [u8; 4] {
        match self {
            Self::Live => [0, 255, 0, 255],
            Self::Frozen => [255, 0, 0, 255],
        }
    }
}

impl From<SnapshotMode> for AnnotationStyle {
    fn from(mode: SnapshotMode) -> Self {
        match mode {
            SnapshotMode::Live => Self::Live,
            SnapshotMode::Frozen => Self::Frozen,
        }
    }
}

/// Face box plus the presentation hints that go with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceAnnotation {
    pub face_box: FaceBox,
    pub label: &'static str,
    pub style: AnnotationStyle,
}

impl FaceAnnotation {
    pub fn live(face_box: FaceBox) -> Self {
        Self {
            face_box,
            label: FACE_LABEL,
            style: AnnotationStyle::Live,
        }
    }

    pub fn frozen(face_box: FaceBox) -> Self {
        Self {
            face_box,
            label: FACE_LABEL,
            style: AnnotationStyle::Frozen,
        }
    }
}
