//! Editing state management module.
//!
//! This module contains the single state container for the editor:
//! - `Store`, owning the current form, the field selection, saved forms and
//!   submissions
//! - `StoreError`, the non-fatal reasons an operation changed nothing

mod error;

pub use error::{StoreError, StoreResult};

#[path = "store_impl.rs"]
mod store_impl;

pub use store_impl::Store;
