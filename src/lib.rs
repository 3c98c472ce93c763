//! Form definition editor.
//!
//! A catalog of field types, the form document model with its validation
//! schema, and an editing store driven by events. The `formcraft` binary
//! exposes the store through a command-line session persisted to disk.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod logger;
pub mod session;
pub mod store;
