//! Session-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing session and form files.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to read a file
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the directory holding a file
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File contents could not be decoded
    #[error("Corrupt session file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Failed to serialize
    #[error("Failed to serialize: {0}")]
    SerializationFailed(String),
}
