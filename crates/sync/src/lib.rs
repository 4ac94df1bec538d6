//! Moneta Sync - bidirectional reconciliation with the remote store.
//!
//! Pull and push both run off an incremental watermark (the last-sync
//! timestamp kept in settings). Conflicts resolve last-write-wins at whole
//! record granularity: whichever side performs the later local upsert for a
//! given identifier wins.

mod auth;
mod client;
mod engine;
mod error;
mod types;

pub use auth::AuthService;
pub use client::{RetryPolicy, SyncClient};
pub use engine::{PullOutcome, PushOutcome, SyncEngine, SyncSummary, SyncTransport};
pub use error::{Result, SyncError};
pub use types::*;
