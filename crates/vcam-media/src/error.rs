//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur outside the per-pixel kernels.
///
/// Kernels themselves never fail; these cover frame construction, host
/// capabilities and IO.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid frame buffer: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("Face detection failed: {0}")]
    DetectionFailed(String),

    #[error("Frame source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl MediaError {
    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create a source unavailable error.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable(message.into())
    }
}

impl From<vcam_models::ModelError> for MediaError {
    fn from(err: vcam_models::ModelError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
