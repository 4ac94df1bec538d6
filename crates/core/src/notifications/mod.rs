//! Debt notification module.
//!
//! The engine runs in its own tokio task with no shared memory: payments are
//! read through the repository trait, while dedup/rate-limit state travels
//! over mpsc channels to a foreground state store that owns persistence.

mod notifications_engine;
mod notifications_model;
mod state_store;

pub use notifications_engine::{DebtNotificationEngine, EngineCommand, PushNotifier, StateRequest};
pub use notifications_model::{NotificationState, MAX_NOTIFIED_IDS, MIN_NOTIFY_INTERVAL_SECS, TODAY_BUCKET};
pub use state_store::spawn_state_store;
