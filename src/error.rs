//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::config::ConfigError;
pub use crate::form::SchemaError;
pub use crate::session::SessionError;
pub use crate::store::StoreError;

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store operation errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Form document validation errors
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Session and form file errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Command-line usage errors
    #[error("Usage error: {0}")]
    Usage(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SchemaIssue;

    #[test]
    fn test_app_error_from_config_error() {
        let config_error = ConfigError::FilePathNotSet;
        let app_error: AppError = config_error.into();
        assert!(matches!(app_error, AppError::Config(_)));
        assert!(app_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_app_error_from_store_error() {
        let store_error = StoreError::NoCurrentForm;
        let app_error: AppError = store_error.into();
        assert!(matches!(app_error, AppError::Store(_)));
        assert!(app_error.to_string().contains("Store error"));
    }

    #[test]
    fn test_app_error_from_schema_error() {
        let schema_error = SchemaError::Invalid {
            issues: vec![SchemaIssue::EmptyTitle],
        };
        let app_error: AppError = schema_error.into();
        assert!(matches!(app_error, AppError::Schema(_)));
        assert!(app_error.to_string().contains("title is required"));
    }

    #[test]
    fn test_app_error_from_session_error() {
        let session_error = SessionError::SerializationFailed("boom".to_string());
        let app_error: AppError = session_error.into();
        assert!(matches!(app_error, AppError::Session(_)));
        assert!(app_error.to_string().contains("boom"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_app_error_usage() {
        let error = AppError::Usage("missing argument".to_string());
        assert!(error.to_string().contains("missing argument"));
    }
}
