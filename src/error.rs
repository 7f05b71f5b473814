//! Crate error types.
//!
//! The text/search core itself is total over its inputs (out-of-range
//! offsets clamp, malformed frames degrade to fallback runs, "no match" is
//! `None`), so errors here come from the infrastructure edges: logging setup
//! and serialization.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup error: {message}")]
    Logging { message: String },
}

impl Error {
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}
