//! Error types for model parsing and validation.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while parsing or validating shared models.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Unknown face filter mode: {0}")]
    UnknownFilterMode(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown gallery source: {0}")]
    UnknownGallerySource(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ModelError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

impl From<validator::ValidationErrors> for ModelError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(errors.to_string())
    }
}
