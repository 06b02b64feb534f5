//! Worker error types.

use std::path::PathBuf;

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Replay file error in {path}: {message}")]
    ReplayFailed { path: PathBuf, message: String },

    #[error("Media error: {0}")]
    Media(#[from] vcam_media::MediaError),

    #[error("Model error: {0}")]
    Model(#[from] vcam_models::ModelError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn replay_failed(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ReplayFailed {
            path: path.into(),
            message: msg.into(),
        }
    }
}
