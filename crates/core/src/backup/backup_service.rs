use std::sync::Arc;

use log::info;

use crate::errors::Result;
use crate::events::DataChangedSink;
use crate::investments::InvestmentRepositoryTrait;
use crate::payments::PaymentRepositoryTrait;

use super::backup_model::BackupData;

/// Export and import-replace across both collections. Import is the clean
/// replace path: all existing records are dropped, the snapshot is written
/// verbatim (ids and timestamps preserved).
pub struct BackupService {
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    payment_repository: Arc<dyn PaymentRepositoryTrait>,
    sink: Arc<dyn DataChangedSink>,
}

impl BackupService {
    pub fn new(
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
        payment_repository: Arc<dyn PaymentRepositoryTrait>,
        sink: Arc<dyn DataChangedSink>,
    ) -> Self {
        BackupService {
            investment_repository,
            payment_repository,
            sink,
        }
    }

    pub fn export_data(&self) -> Result<BackupData> {
        Ok(BackupData {
            invests: self.investment_repository.list_investments()?,
            payments: self.payment_repository.list_payments()?,
        })
    }

    pub async fn import_data(&self, data: BackupData) -> Result<()> {
        let invests = self.investment_repository.replace_all(data.invests).await?;
        let payments = self.payment_repository.replace_all(data.payments).await?;
        info!(
            "Imported backup: {} investments, {} payments",
            invests, payments
        );
        self.sink.publish();
        Ok(())
    }
}
