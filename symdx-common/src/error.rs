//! Common error types for symdx

use thiserror::Error;

/// Common result type for symdx operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across symdx crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error (artifacts, metrics)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact is structurally invalid after decoding
    #[error("Invalid artifact: {0}")]
    Artifact(String),

    /// Failure while running vectorizer, classifier or label encoder
    ///
    /// Displayed verbatim; the HTTP layer returns this text to the caller.
    #[error("{0}")]
    Inference(String),
}
