//! Durable state of the debt notification engine.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Rate-limit bucket for obligations due on the current calendar day.
pub const TODAY_BUCKET: &str = "today";

/// Minimum seconds between two alerts for the same bucket.
pub const MIN_NOTIFY_INTERVAL_SECS: i64 = 3600;

/// Upper bound on the notified-set; older entries are dropped first.
pub const MAX_NOTIFIED_IDS: usize = 100;

/// Dedup and rate-limit state, exchanged with the foreground as a versioned
/// message payload and persisted there as a JSON settings blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    /// Payment ids already notified, oldest first.
    pub notified_ids: Vec<String>,
    /// Bucket key -> timestamp of the last alert sent for that bucket.
    pub last_notified: HashMap<String, DateTime<Utc>>,
}

impl NotificationState {
    pub fn is_notified(&self, payment_id: &str) -> bool {
        self.notified_ids.iter().any(|id| id == payment_id)
    }

    /// Append ids not yet present, preserving recency order.
    pub fn record_notified(&mut self, payment_ids: impl IntoIterator<Item = String>) {
        for id in payment_ids {
            if !self.is_notified(&id) {
                self.notified_ids.push(id);
            }
        }
    }

    /// Keep only the most recent [`MAX_NOTIFIED_IDS`] entries.
    pub fn truncate_notified(&mut self) {
        if self.notified_ids.len() > MAX_NOTIFIED_IDS {
            let excess = self.notified_ids.len() - MAX_NOTIFIED_IDS;
            self.notified_ids.drain(..excess);
        }
    }

    /// Whether the bucket's minimum interval has elapsed at `now`.
    /// An absent bucket timestamp never throttles.
    pub fn interval_elapsed(&self, bucket: &str, now: DateTime<Utc>) -> bool {
        match self.last_notified.get(bucket) {
            None => true,
            Some(last) => now - *last >= Duration::seconds(MIN_NOTIFY_INTERVAL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_notified_deduplicates() {
        let mut state = NotificationState::default();
        state.record_notified(["a".to_string(), "b".to_string()]);
        state.record_notified(["b".to_string(), "c".to_string()]);
        assert_eq!(state.notified_ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_truncate_keeps_most_recent() {
        let mut state = NotificationState::default();
        state.record_notified((0..150).map(|i| format!("p{}", i)));
        state.truncate_notified();
        assert_eq!(state.notified_ids.len(), MAX_NOTIFIED_IDS);
        assert_eq!(state.notified_ids.first().unwrap(), "p50");
        assert_eq!(state.notified_ids.last().unwrap(), "p149");
    }

    #[test]
    fn test_interval_elapsed() {
        let now = Utc::now();
        let mut state = NotificationState::default();
        assert!(state.interval_elapsed(TODAY_BUCKET, now));

        state.last_notified.insert(TODAY_BUCKET.to_string(), now);
        assert!(!state.interval_elapsed(TODAY_BUCKET, now));
        assert!(state.interval_elapsed(
            TODAY_BUCKET,
            now + Duration::seconds(MIN_NOTIFY_INTERVAL_SECS)
        ));
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = NotificationState::default();
        state.record_notified(["a".to_string()]);
        state
            .last_notified
            .insert(TODAY_BUCKET.to_string(), Utc::now());

        let raw = serde_json::to_string(&state).unwrap();
        let back: NotificationState = serde_json::from_str(&raw).unwrap();
        assert_eq!(state, back);
    }
}
