//! Foreground collaborator persisting notification state.
//!
//! The engine cannot reach storage for its own state; this task answers its
//! load/save requests against the settings repository.

use std::sync::Arc;

use log::warn;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::constants::SETTING_NOTIFICATION_STATE;
use crate::settings::SettingsRepositoryTrait;

use super::notifications_engine::{EngineCommand, StateRequest};
use super::notifications_model::NotificationState;

/// Spawn the foreground state store task.
///
/// `Load` requests are answered with [`EngineCommand::StateFromClient`] on
/// `engine_tx` (empty state when nothing is persisted or the blob does not
/// parse); `Save` requests are written as a JSON settings blob.
pub fn spawn_state_store(
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
    mut requests: mpsc::Receiver<StateRequest>,
    engine_tx: mpsc::Sender<EngineCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            match request {
                StateRequest::Load => {
                    let state: NotificationState = settings_repository
                        .get_setting(SETTING_NOTIFICATION_STATE)
                        .unwrap_or_else(|e| {
                            warn!("Failed to load notification state: {}", e);
                            None
                        })
                        .and_then(|raw| serde_json::from_str(&raw).ok())
                        .unwrap_or_default();
                    if engine_tx
                        .send(EngineCommand::StateFromClient(state))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                StateRequest::Save(state) => match serde_json::to_string(&state) {
                    Ok(raw) => {
                        if let Err(e) = settings_repository
                            .set_setting(SETTING_NOTIFICATION_STATE, &raw)
                            .await
                        {
                            warn!("Failed to persist notification state: {}", e);
                        }
                    }
                    Err(e) => warn!("Failed to serialize notification state: {}", e),
                },
            }
        }
    })
}
