//! Repository trait for application settings.

use async_trait::async_trait;

use crate::errors::Result;

/// String key/value store backing the sync watermark, the bearer credential,
/// and the persisted notification-engine state.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get a single setting value by key. Returns `None` if not set.
    fn get_setting(&self, setting_key: &str) -> Result<Option<String>>;

    /// Set (or overwrite) a single setting value.
    async fn set_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;
}
