//! Settings module - key/value persistence for sync and notification state.

mod settings_traits;

pub use settings_traits::SettingsRepositoryTrait;
