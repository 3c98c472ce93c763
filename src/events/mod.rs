//! Event handling module.
//!
//! This module contains handlers for editor events: each `Event` names one
//! store operation and the `Handler` applies it to a borrowed `Store`.

pub mod editor;

pub use editor::{Event, Handler};
