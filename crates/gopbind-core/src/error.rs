//! Snapshot error types.

/// Errors that can occur while acquiring or validating a module snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The snapshot document is structurally valid JSON but unusable.
    #[error("invalid snapshot: {detail}")]
    InvalidSnapshot { detail: String },

    /// JSON decoding error.
    #[error("snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, CoreError>;
