//! Errors raised while loading or querying session data.

/// Input validation and lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Input is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Invalid AOI '{name}': {message}")]
    InvalidAoi { name: String, message: String },

    #[error("Page not found: {page}")]
    PageNotFound { page: String },

    #[error("AOI {index} does not exist on page '{page}'")]
    AoiNotFound { page: String, index: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for session model operations.
pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// True when the error comes from a registry lookup rather than bad input.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::PageNotFound { .. } | Self::AoiNotFound { .. })
    }
}
