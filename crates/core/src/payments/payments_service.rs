use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use log::{debug, info};

use crate::errors::{Error, Result};
use crate::events::DataChangedSink;
use crate::investments::InvestmentRepositoryTrait;

use super::payments_model::{NewPayment, Payment, PaymentUpdate, RollbackResult};
use super::payments_scheduler::{next_due_date, payment_amount};
use super::payments_traits::{PaymentRepositoryTrait, PaymentServiceTrait};

pub struct PaymentService {
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    payment_repository: Arc<dyn PaymentRepositoryTrait>,
    sink: Arc<dyn DataChangedSink>,
}

impl PaymentService {
    pub fn new(
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
        payment_repository: Arc<dyn PaymentRepositoryTrait>,
        sink: Arc<dyn DataChangedSink>,
    ) -> Self {
        PaymentService {
            investment_repository,
            payment_repository,
            sink,
        }
    }
}

#[async_trait]
impl PaymentServiceTrait for PaymentService {
    fn get_payments(&self) -> Result<Vec<Payment>> {
        self.payment_repository.list_payments()
    }

    fn get_payments_for_investment(&self, investment_id: &str) -> Result<Vec<Payment>> {
        self.payment_repository.list_for_investment(investment_id)
    }

    async fn generate_due_payments(&self) -> Result<Vec<Payment>> {
        let mut created = Vec::new();

        for investment in self.investment_repository.list_active_investments()? {
            let history = self
                .payment_repository
                .list_for_investment(&investment.id)?;

            // One unpaid obligation per investment at a time: an outstanding
            // payment blocks generation entirely.
            let anchor = match history.last() {
                None => investment.created_date,
                Some(latest) if !latest.is_paid => {
                    debug!(
                        "Investment {} has an unpaid payment, skipping",
                        investment.id
                    );
                    continue;
                }
                Some(latest) => latest.due_date,
            };

            let billing_day = investment.created_date.day();
            let new_payment = NewPayment {
                invest_id: investment.id.clone(),
                amount: payment_amount(investment.amount, investment.effective_ratio()),
                due_date: next_due_date(anchor, billing_day),
                is_paid: false,
            };
            let payment = self.payment_repository.insert_new_payment(new_payment).await?;
            debug!(
                "Scheduled payment {} for investment {} due {}",
                payment.id, investment.id, payment.due_date
            );
            created.push(payment);
        }

        if !created.is_empty() {
            info!("Scheduler generated {} payment(s)", created.len());
            self.sink.publish();
        }
        Ok(created)
    }

    async fn mark_paid(&self, payment_id: &str) -> Result<Payment> {
        let mut payment = self.payment_repository.get_payment(payment_id)?;
        payment.is_paid = true;
        let updated = self.payment_repository.update_payment(payment).await?;
        self.sink.publish();
        Ok(updated)
    }

    async fn update_payment(&self, update: PaymentUpdate) -> Result<Payment> {
        let mut payment = self.payment_repository.get_payment(&update.id)?;
        if let Some(amount) = update.amount {
            payment.amount = amount;
        }
        if let Some(due_date) = update.due_date {
            payment.due_date = due_date;
        }
        let updated = self.payment_repository.update_payment(payment).await?;
        self.sink.publish();
        Ok(updated)
    }

    async fn rollback_last_payment(&self) -> Result<RollbackResult> {
        let mut payments = self.payment_repository.list_payments()?;
        // "Most recent" is due-date sort order, not temporal adjacency; with
        // several unpaid payments (reachable only through manual edits) the
        // newest unpaid one is the match.
        payments.sort_by_key(|p| p.due_date);

        let removed = payments
            .iter()
            .rev()
            .find(|p| !p.is_paid)
            .cloned()
            .ok_or_else(|| Error::NotFound("No unpaid payment to roll back".to_string()))?;
        self.payment_repository.delete_payment(&removed.id).await?;

        let mut reopened = None;
        if let Some(previous) = payments.iter().rev().find(|p| p.is_paid) {
            let mut previous = previous.clone();
            previous.is_paid = false;
            reopened = Some(self.payment_repository.update_payment(previous).await?);
        }

        info!(
            "Rolled back payment {} (reopened: {:?})",
            removed.id,
            reopened.as_ref().map(|p| p.id.as_str())
        );
        self.sink.publish();
        Ok(RollbackResult { removed, reopened })
    }
}
