//! Host worker for the vcam processing core.
//!
//! This crate provides:
//! - Environment-driven configuration
//! - Image-sequence playback and detection replay
//! - A tick loop reading operator commands from stdin
//! - PNG and JSON-lines output publishing

pub mod config;
pub mod error;
pub mod logging;
pub mod publisher;
pub mod replay;
pub mod runner;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::TickLogger;
pub use publisher::OutputPublisher;
pub use replay::ReplayDetector;
pub use runner::{parse_control_line, ControlLine, RunStats, Runner, Slider};
