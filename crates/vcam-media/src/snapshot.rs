//! Live/Frozen snapshot state.
//!
//! Freezing stores an owned copy of the working-resolution frame and of the
//! face box located on the last live tick. Unfreezing drops both; nothing
//! carries back into live detection.

use tracing::info;
use vcam_models::{FaceBox, SnapshotMode};

use crate::frame::Frame;

/// Frame and face box retained while frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenSnapshot {
    pub frame: Frame,
    pub face_box: Option<FaceBox>,
}

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Froze { has_face: bool },
    Resumed,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Froze { .. } => "froze",
            Self::Resumed => "resumed",
        }
    }
}

/// Snapshot state machine. Starts Live.
#[derive(Debug, Clone, Default)]
pub struct SnapshotState {
    frozen: Option<FrozenSnapshot>,
}

impl SnapshotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SnapshotMode {
        if self.frozen.is_some() {
            SnapshotMode::Frozen
        } else {
            SnapshotMode::Live
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Retained snapshot, present only while frozen.
    pub fn frozen(&self) -> Option<&FrozenSnapshot> {
        self.frozen.as_ref()
    }

    pub fn frozen_face(&self) -> Option<FaceBox> {
        self.frozen.as_ref().and_then(|s| s.face_box)
    }

    /// Enter Frozen with the given frame and face box.
    pub fn freeze(&mut self, frame: Frame, face_box: Option<FaceBox>) -> Transition {
        let has_face = face_box.is_some();
        info!(
            width = frame.width(),
            height = frame.height(),
            has_face,
            "Snapshot frozen"
        );
        self.frozen = Some(FrozenSnapshot { frame, face_box });
        Transition::Froze { has_face }
    }

    /// Return to Live, discarding the snapshot.
    pub fn unfreeze(&mut self) -> Transition {
        self.frozen = None;
        info!("Snapshot released, resuming live detection");
        Transition::Resumed
    }

    /// Flip between Live and Frozen. `capture` is only invoked when freezing.
    pub fn toggle<F>(&mut self, capture: F) -> Transition
    where
        F: FnOnce() -> (Frame, Option<FaceBox>),
    {
        if self.is_frozen() {
            self.unfreeze()
        } else {
            let (frame, face_box) = capture();
            self.freeze(frame, face_box)
        }
    }
}
