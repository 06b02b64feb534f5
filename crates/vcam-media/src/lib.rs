//! Per-frame processing core for the vcam multi-view camera.
//!
//! This crate provides:
//! - Stateless RGBA pixel kernels (grayscale, channel isolation, CMY, HSV, thresholds)
//! - Two-frame motion differencing with a reusable sample buffer
//! - Face location through an injected detection capability
//! - A Live/Frozen snapshot workflow with face-region filtering
//! - A tick-driven pipeline tying it all together

pub mod compositor;
pub mod error;
pub mod face;
pub mod frame;
pub mod gallery;
pub mod kernels;
pub mod metrics;
pub mod motion;
pub mod pipeline;
pub mod snapshot;
pub mod source;

pub use compositor::{clamp_to_frame, CompositorConfig, FaceRegionCompositor, FilteredRegion};
pub use error::{MediaError, MediaResult};
pub use face::{
    select_face, AnnotationStyle, FaceAnnotation, FaceDetectionCapability, FaceLocator,
    NullDetector,
};
pub use frame::{Frame, Pixel, Region};
pub use gallery::{GalleryTile, KernelGallery};
pub use motion::{MotionDetector, MotionReport};
pub use pipeline::{PublishedOutputs, TickContext, TickOutcome, VisionPipeline};
pub use snapshot::{FrozenSnapshot, SnapshotState, Transition};
pub use source::{FrameSource, ImageSequenceSource, QueuedSource};
