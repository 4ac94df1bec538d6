//! Backup module - full export and import-replace of both collections.

mod backup_model;
mod backup_service;

pub use backup_model::BackupData;
pub use backup_service::BackupService;
