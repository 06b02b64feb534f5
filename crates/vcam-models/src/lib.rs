//! Shared data models for the vcam frame processing core.
//!
//! This crate provides Serde-serializable types for:
//! - Face detections and the selected face box
//! - Motion samples
//! - Kernel thresholds and channel tags
//! - Face filter modes, snapshot modes and control commands
//! - Pipeline configuration and per-tick summaries

pub mod command;
pub mod config;
pub mod detection;
pub mod error;
pub mod filter_mode;
pub mod motion;
pub mod summary;
pub mod thresholds;

// Re-export common types
pub use command::{Command, SnapshotMode};
pub use config::{GallerySource, PipelineConfig};
pub use detection::{FaceBox, RawDetection};
pub use error::{ModelError, ModelResult};
pub use filter_mode::FaceFilterMode;
pub use motion::MotionSample;
pub use summary::{FaceSummary, TickSummary};
pub use thresholds::{Channel, Thresholds};
