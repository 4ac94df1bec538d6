//! Data-changed event module.
//!
//! Provides the observer interface through which the storage-facing services
//! notify the (excluded) UI collaborator that persisted data changed. This is
//! the sole outbound event of the core.

mod sink;

pub use sink::*;
