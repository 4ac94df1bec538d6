//! Application-wide constants.

/// Income ratio applied when an investment has none recorded.
pub const DEFAULT_INCOME_RATIO: f64 = 0.05;

/// Settings key holding the sync watermark (RFC 3339, UTC).
pub const SETTING_LAST_SYNC: &str = "last_sync_at";

/// Settings key holding the bearer credential for the remote store.
pub const SETTING_AUTH_TOKEN: &str = "auth_token";

/// Settings key holding the serialized notification engine state.
pub const SETTING_NOTIFICATION_STATE: &str = "notification_state";
