//! Background debt notification engine.
//!
//! Triggered by periodic wake-ups and explicit commands. The engine starts
//! with empty state and requests a load from the foreground; it may process
//! triggers before the reply arrives, which is accepted - the host platform
//! can suspend and cold-start this task at any time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::errors::Result;
use crate::payments::PaymentRepositoryTrait;

use super::notifications_model::{NotificationState, TODAY_BUCKET};

/// Platform push-notification facility consumed by the engine.
pub trait PushNotifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Commands accepted by the engine task.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Run a debt check. `force` ignores the dedup set and resets the
    /// rate-limit bucket before checking.
    CheckDebts { force: bool },
    /// State loaded by the foreground in response to [`StateRequest::Load`].
    StateFromClient(NotificationState),
    /// Clear all dedup/rate-limit state.
    ResetNotifications,
    /// Truncate the notified-set to its bound.
    CleanupNotifications,
}

/// Requests the engine sends to the foreground state store. The engine has
/// no synchronous storage access for its own state.
#[derive(Debug, Clone)]
pub enum StateRequest {
    Load,
    Save(NotificationState),
}

pub struct DebtNotificationEngine {
    payment_repository: Arc<dyn PaymentRepositoryTrait>,
    notifier: Arc<dyn PushNotifier>,
    state_tx: mpsc::Sender<StateRequest>,
    state: NotificationState,
}

impl DebtNotificationEngine {
    pub fn new(
        payment_repository: Arc<dyn PaymentRepositoryTrait>,
        notifier: Arc<dyn PushNotifier>,
        state_tx: mpsc::Sender<StateRequest>,
    ) -> Self {
        DebtNotificationEngine {
            payment_repository,
            notifier,
            state_tx,
            state: NotificationState::default(),
        }
    }

    /// Drive the engine: request a state load, then serve commands and
    /// periodic wake-ups until the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<EngineCommand>, wake_every: Duration) {
        // get-notification-state; empty state until (and unless) a reply lands.
        let _ = self.state_tx.send(StateRequest::Load).await;

        let mut ticker = interval(wake_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                _ = ticker.tick() => {
                    self.handle(EngineCommand::CheckDebts { force: false }).await;
                }
            }
        }
        debug!("Notification engine stopped: command channel closed");
    }

    /// Process one command. Errors are logged and never propagate - an
    /// escaping panic/error would risk losing future scheduled wake-ups.
    pub async fn handle(&mut self, command: EngineCommand) {
        let outcome = match command {
            EngineCommand::CheckDebts { force } => self.check_debts(force).await.map(|_| ()),
            EngineCommand::StateFromClient(state) => {
                debug!(
                    "Notification state received ({} notified ids)",
                    state.notified_ids.len()
                );
                self.state = state;
                Ok(())
            }
            EngineCommand::ResetNotifications => {
                self.state = NotificationState::default();
                self.request_save().await
            }
            EngineCommand::CleanupNotifications => {
                self.state.truncate_notified();
                self.request_save().await
            }
        };
        if let Err(e) = outcome {
            error!("Notification engine trigger failed: {}", e);
        }
    }

    /// Run one debt check. Returns whether an alert was emitted.
    async fn check_debts(&mut self, force: bool) -> Result<bool> {
        let now = Utc::now();
        let today = Local::now().date_naive();

        let due_today: Vec<_> = self
            .payment_repository
            .list_unpaid()?
            .into_iter()
            .filter(|p| p.due_date == today)
            .collect();

        if force {
            self.state.last_notified.remove(TODAY_BUCKET);
        }
        let fresh: Vec<_> = due_today
            .into_iter()
            .filter(|p| force || !self.state.is_notified(&p.id))
            .collect();

        if fresh.is_empty() {
            debug!("Debt check: nothing new due today");
            return Ok(false);
        }
        if !self.state.interval_elapsed(TODAY_BUCKET, now) {
            debug!("Debt check: {} due but rate-limited", fresh.len());
            return Ok(false);
        }

        let total: f64 = fresh.iter().map(|p| p.amount).sum();
        self.notifier.notify(
            &format!("{} interest payment(s) due", fresh.len()),
            &format!("Payments due today total {:.2}", total),
        );
        info!("Debt alert emitted: {} payment(s), total {:.2}", fresh.len(), total);

        self.state
            .record_notified(fresh.into_iter().map(|p| p.id));
        self.state
            .last_notified
            .insert(TODAY_BUCKET.to_string(), now);
        self.state.truncate_notified();
        self.request_save().await?;
        Ok(true)
    }

    async fn request_save(&self) -> Result<()> {
        self.state_tx
            .send(StateRequest::Save(self.state.clone()))
            .await
            .map_err(|_| {
                crate::errors::Error::Notification(
                    "State store channel closed, save request dropped".to_string(),
                )
            })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &NotificationState {
        &self.state
    }
}
