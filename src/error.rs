//! Error types for cinemelt.
//!
//! Only environment failures are errors. Malformed data inside a row never
//! surfaces here; it degrades to missing values instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for cinemelt operations.
#[derive(Debug, Error)]
pub enum CinemeltError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing records to an output stream.
    #[error("Write error: {0}")]
    Write(#[source] std::io::Error),

    /// Error reading a CSV source.
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CinemeltError {
    /// Adapter for `map_err` attaching the path an I/O error occurred on.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> CinemeltError {
        let path = path.to_path_buf();
        move |source| CinemeltError::Io { path, source }
    }
}

/// Result type alias for cinemelt operations.
pub type Result<T> = std::result::Result<T, CinemeltError>;
