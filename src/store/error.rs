//! Store-specific error types.
//!
//! None of these are fatal. They report why an operation left the store
//! untouched, and callers are free to ignore them.

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No form is open for editing
    #[error("No form is open for editing")]
    NoCurrentForm,

    /// Saved form not found
    #[error("Form not found: {id}")]
    FormNotFound { id: String },

    /// Field not found in the current form
    #[error("Field not found: {id}")]
    FieldNotFound { id: String },

    /// Field id already present in the current form
    #[error("Field id already exists in form: {id}")]
    DuplicateFieldId { id: String },

    /// Field position outside the current field list
    #[error("Field index {index} out of range for {len} fields")]
    FieldIndexOutOfRange { index: usize, len: usize },
}

/// Convenience type alias for store operation results
pub type StoreResult<T> = Result<T, StoreError>;
