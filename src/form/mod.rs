//! Form document model.
//!
//! This module contains everything that describes a form independent of
//! editing state:
//! - Field types, field records and partial field updates
//! - The static field catalog and `create_field`
//! - Form configurations, settings and submissions
//! - The validation schema applied at import/export boundaries

pub mod catalog;
pub mod document;
pub mod field;
pub mod schema;

pub use catalog::{create_field, FieldTypeInfo, CATALOG};
pub use document::{FormConfiguration, FormSettings, FormSubmission};
pub use field::{DefaultValue, Field, FieldKind, FieldType, FieldUpdate, FieldValidation};
pub use schema::{SchemaError, SchemaIssue};
