//! Watermark-based bidirectional reconciliation.
//!
//! Pull applies server records through the verbatim `upsert_*` repository
//! paths so remote `last_modified` stamps survive. Push sends everything the
//! local store modified at or after the watermark. Only pull moves the
//! watermark, and the combined cycle snapshots the cursor before pulling:
//! otherwise the pull would advance it past local edits made since the
//! previous cycle and the push leg would skip them forever.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use moneta_core::constants::{SETTING_AUTH_TOKEN, SETTING_LAST_SYNC};
use moneta_core::events::DataChangedSink;
use moneta_core::investments::InvestmentRepositoryTrait;
use moneta_core::payments::PaymentRepositoryTrait;
use moneta_core::settings::SettingsRepositoryTrait;

use crate::client::SyncClient;
use crate::error::Result;
use crate::types::*;

/// Transport seam between the engine and the HTTP client, mockable in tests.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    async fn fetch_updates(&self, token: &str, since: Option<String>) -> Result<PullResponse>;
    async fn push_updates(&self, token: &str, req: PushRequest) -> Result<PushResponse>;
}

#[async_trait]
impl SyncTransport for SyncClient {
    async fn fetch_updates(&self, token: &str, since: Option<String>) -> Result<PullResponse> {
        SyncClient::fetch_updates(self, token, since.as_deref()).await
    }

    async fn push_updates(&self, token: &str, req: PushRequest) -> Result<PushResponse> {
        SyncClient::push_updates(self, token, &req).await
    }
}

/// What a pull cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum PullOutcome {
    /// No bearer credential stored; no request was made.
    NoCredential,
    /// Server reported nothing newer than the watermark.
    NoUpdates,
    /// Server records were applied locally.
    Applied { invests: usize, payments: usize },
    /// Server answered with an unrecognized status; nothing was applied.
    ServerWarning(String),
}

/// What a push cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// No bearer credential stored; no request was made.
    NoCredential,
    /// Nothing modified since the watermark; no request was made.
    NothingToPush,
    /// Locally modified records were sent.
    Pushed { invests: usize, payments: usize },
}

/// Result of a full pull-then-push cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    pub pull: PullOutcome,
    /// `None` when the push leg failed; the failure is logged, not raised,
    /// because the pulled records are already applied.
    pub push: Option<PushOutcome>,
}

/// Reconciles the local store with the remote one.
pub struct SyncEngine {
    transport: Arc<dyn SyncTransport>,
    settings: Arc<dyn SettingsRepositoryTrait>,
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    payment_repository: Arc<dyn PaymentRepositoryTrait>,
    sink: Arc<dyn DataChangedSink>,
}

impl SyncEngine {
    pub fn new(
        transport: Arc<dyn SyncTransport>,
        settings: Arc<dyn SettingsRepositoryTrait>,
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
        payment_repository: Arc<dyn PaymentRepositoryTrait>,
        sink: Arc<dyn DataChangedSink>,
    ) -> Self {
        Self {
            transport,
            settings,
            investment_repository,
            payment_repository,
            sink,
        }
    }

    fn token(&self) -> moneta_core::Result<Option<String>> {
        // Sign-out blanks the stored value rather than deleting the row.
        Ok(self
            .settings
            .get_setting(SETTING_AUTH_TOKEN)?
            .filter(|token| !token.is_empty()))
    }

    /// Stored watermark, or `None` on first sync. An unparseable stored
    /// value degrades to a full sync rather than an error.
    fn watermark(&self) -> moneta_core::Result<Option<DateTime<Utc>>> {
        let raw = self.settings.get_setting(SETTING_LAST_SYNC)?;
        Ok(raw.and_then(|value| match DateTime::parse_from_rfc3339(&value) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(err) => {
                warn!("Ignoring unparseable sync watermark {:?}: {}", value, err);
                None
            }
        }))
    }

    async fn advance_watermark(&self) -> moneta_core::Result<()> {
        // The cursor is this client's clock, not the server's. A fast local
        // clock can skip server records written shortly after the pull; the
        // next full (watermark-less) sync heals it.
        self.settings
            .set_setting(SETTING_LAST_SYNC, &Utc::now().to_rfc3339())
            .await
    }

    /// Fetch server-side changes since the watermark and apply them locally.
    /// Advances the watermark on every answered request, including
    /// `no_updates` and unrecognized statuses.
    pub async fn pull(&self) -> moneta_core::Result<PullOutcome> {
        let Some(token) = self.token()? else {
            debug!("Pull skipped: not signed in");
            return Ok(PullOutcome::NoCredential);
        };
        let since = self.watermark()?.map(|cutoff| cutoff.to_rfc3339());

        let response = self.transport.fetch_updates(&token, since).await?;

        let outcome = match response.status.as_str() {
            STATUS_SUCCESS => {
                let invests = response.invests.unwrap_or_default();
                let payments = response.payments.unwrap_or_default();
                let (invest_count, payment_count) = (invests.len(), payments.len());

                for dto in invests {
                    self.investment_repository
                        .upsert_investment(dto.into())
                        .await?;
                }
                for dto in payments {
                    self.payment_repository.upsert_payment(dto.into()).await?;
                }

                info!(
                    "Pull applied {} invests, {} payments",
                    invest_count, payment_count
                );
                if invest_count + payment_count > 0 {
                    self.sink.publish();
                }
                PullOutcome::Applied {
                    invests: invest_count,
                    payments: payment_count,
                }
            }
            STATUS_NO_UPDATES => PullOutcome::NoUpdates,
            other => {
                warn!("Pull got unexpected status {:?}", other);
                PullOutcome::ServerWarning(other.to_string())
            }
        };

        self.advance_watermark().await?;
        Ok(outcome)
    }

    /// Send everything the local store modified at or after the watermark.
    /// Never advances the watermark.
    pub async fn push(&self) -> moneta_core::Result<PushOutcome> {
        let cutoff = self.watermark()?;
        self.push_since(cutoff).await
    }

    async fn push_since(&self, cutoff: Option<DateTime<Utc>>) -> moneta_core::Result<PushOutcome> {
        let Some(token) = self.token()? else {
            debug!("Push skipped: not signed in");
            return Ok(PushOutcome::NoCredential);
        };

        let invests: Vec<InvestDto> = self
            .investment_repository
            .list_modified_since(cutoff)?
            .into_iter()
            .map(Into::into)
            .collect();
        let payments: Vec<PaymentDto> = self
            .payment_repository
            .list_modified_since(cutoff)?
            .into_iter()
            .map(Into::into)
            .collect();

        if invests.is_empty() && payments.is_empty() {
            debug!("Push skipped: nothing modified since watermark");
            return Ok(PushOutcome::NothingToPush);
        }

        let (invest_count, payment_count) = (invests.len(), payments.len());
        let response = self
            .transport
            .push_updates(&token, PushRequest { invests, payments })
            .await?;
        if response.status != STATUS_SUCCESS {
            warn!("Push got unexpected status {:?}", response.status);
        }

        info!(
            "Pushed {} invests, {} payments",
            invest_count, payment_count
        );
        Ok(PushOutcome::Pushed {
            invests: invest_count,
            payments: payment_count,
        })
    }

    /// Full cycle: pull, then push everything modified since the watermark
    /// as it stood when the cycle started. A pull failure aborts the cycle;
    /// a push failure is logged and reported as an absent push outcome.
    pub async fn sync(&self) -> moneta_core::Result<SyncSummary> {
        // Snapshot before the pull moves the cursor; the push leg must see
        // local edits made between the previous cycle and this one.
        let cutoff = self.watermark()?;
        let pull = self.pull().await?;
        let push = match self.push_since(cutoff).await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!("Push leg failed: {}", err);
                None
            }
        };
        Ok(SyncSummary { pull, push })
    }
}
