//! Error types shared across Gazekit crates.

use std::path::PathBuf;

use gazekit_session_model::SessionError;

/// Top-level error type for Gazekit operations.
#[derive(Debug, thiserror::Error)]
pub enum GazekitError {
    /// Sample or layout input could not be used (missing column, bad row,
    /// unknown page or AOI).
    #[error("Input error: {0}")]
    Input(#[from] SessionError),

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using GazekitError.
pub type GazekitResult<T> = Result<T, GazekitError>;

impl GazekitError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
