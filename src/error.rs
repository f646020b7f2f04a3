//! Error types for the heat map pipeline.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, normalizing or rendering the dataset.
///
/// Every variant is terminal for the one-shot pipeline: nothing is drawn once
/// one of these has been returned.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, non-success status, or unreadable response body.
    #[error("network error: {0}")]
    Network(String),

    /// The response body is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Required fields are missing or have the wrong type.
    #[error("schema error: {0}")]
    Schema(String),

    /// The dataset contains no temperature records.
    #[error("dataset contains no records")]
    EmptyDataset,

    /// I/O error (writing output files, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Chart configuration could not be parsed or is unusable.
    #[error("configuration error at line {line}: {message}")]
    Config {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
