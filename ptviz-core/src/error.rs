//! Error types for ptviz

use thiserror::Error;

/// Main error type for ptviz operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid table shape: expected {expected}, found {found} columns")]
    InvalidShape { expected: String, found: usize },

    #[error("Unknown color code '{0}' (expected one of r, g, b, c, m, y, k, w)")]
    UnknownColor(char),

    #[error("No actor with id {0}")]
    ActorNotFound(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("GPU error: {0}")]
    Gpu(String),
}

impl Error {
    /// Shorthand for a shape mismatch against a human readable expectation
    pub fn invalid_shape(expected: impl Into<String>, found: usize) -> Self {
        Error::InvalidShape {
            expected: expected.into(),
            found,
        }
    }
}

/// Result type alias for ptviz operations
pub type Result<T> = std::result::Result<T, Error>;
