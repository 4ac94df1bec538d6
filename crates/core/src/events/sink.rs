//! Data-changed sink trait and implementations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Trait for receiving the "data changed" notification.
///
/// Core services publish through this trait after successful mutations.
///
/// # Design Rules
///
/// - `publish()` must be fast and non-blocking (no network calls, no DB writes)
/// - Failure to deliver must not affect domain operations (best-effort)
pub trait DataChangedSink: Send + Sync {
    /// Signal that investment/payment data changed.
    fn publish(&self);
}

/// Handler type registered with [`ChangeBroadcaster::subscribe`].
pub type ChangeHandler = Box<dyn Fn() + Send + Sync>;

/// Fan-out implementation: subscribers register a handler, publishers invoke
/// all of them. Constructed once and injected where needed; there is no
/// global event bus.
#[derive(Default)]
pub struct ChangeBroadcaster {
    handlers: Mutex<Vec<ChangeHandler>>,
}

impl ChangeBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler invoked on every publish.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.lock().unwrap().push(Box::new(handler));
    }
}

impl DataChangedSink for ChangeBroadcaster {
    fn publish(&self) {
        for handler in self.handlers.lock().unwrap().iter() {
            handler();
        }
    }
}

/// No-op implementation for tests or contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpDataChangedSink;

impl DataChangedSink for NoOpDataChangedSink {
    fn publish(&self) {
        // Intentionally empty - the notification is discarded
    }
}

/// Mock sink for testing - counts publishes.
#[derive(Clone, Default)]
pub struct MockDataChangedSink {
    count: Arc<AtomicUsize>,
}

impl MockDataChangedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `publish()` was called.
    pub fn publish_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl DataChangedSink for MockDataChangedSink {
    fn publish(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
