use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use log::{debug, info};

use crate::errors::{Error, Result, ValidationError};
use crate::events::DataChangedSink;
use crate::payments::{payment_amount, PaymentRepositoryTrait};

use super::investments_model::{Investment, InvestmentUpdate, NewInvestment};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};

pub struct InvestmentService {
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    payment_repository: Arc<dyn PaymentRepositoryTrait>,
    sink: Arc<dyn DataChangedSink>,
}

impl InvestmentService {
    pub fn new(
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
        payment_repository: Arc<dyn PaymentRepositoryTrait>,
        sink: Arc<dyn DataChangedSink>,
    ) -> Self {
        InvestmentService {
            investment_repository,
            payment_repository,
            sink,
        }
    }

    fn validate_amount(amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Investment amount must be positive, got {}",
                amount
            ))));
        }
        Ok(())
    }

    fn validate_ratio(ratio: Option<f64>) -> Result<()> {
        if let Some(r) = ratio {
            if !r.is_finite() || r <= 0.0 || r > 1.0 {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Income ratio must be a fraction in (0, 1], got {}",
                    r
                ))));
            }
        }
        Ok(())
    }

    /// Recompute every unpaid payment of `investment` from its current
    /// principal. Paid payments are left untouched, preserving history.
    async fn recompute_unpaid_payments(&self, investment: &Investment) -> Result<usize> {
        let payments = self
            .payment_repository
            .list_for_investment(&investment.id)?;
        let mut recomputed = 0;
        for mut payment in payments.into_iter().filter(|p| !p.is_paid) {
            payment.amount = payment_amount(investment.amount, investment.effective_ratio());
            self.payment_repository.update_payment(payment).await?;
            recomputed += 1;
        }
        Ok(recomputed)
    }
}

#[async_trait]
impl InvestmentServiceTrait for InvestmentService {
    fn get_investments(&self) -> Result<Vec<Investment>> {
        self.investment_repository.list_investments()
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.investment_repository.get_investment(investment_id)
    }

    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment> {
        Self::validate_amount(new_investment.amount)?;
        Self::validate_ratio(new_investment.ratio)?;

        let created = self
            .investment_repository
            .insert_new_investment(new_investment)
            .await?;
        info!("Created investment {}", created.id);
        self.sink.publish();
        Ok(created)
    }

    async fn update_investment(&self, update: InvestmentUpdate) -> Result<Investment> {
        Self::validate_amount(update.amount)?;

        let mut investment = self.investment_repository.get_investment(&update.id)?;
        investment.amount = update.amount;
        if let Some(date) = update.created_date {
            investment.created_date = date;
        }

        let updated = self
            .investment_repository
            .update_investment(investment)
            .await?;

        // Not atomic with the update above: the recompute spans its own
        // await points and a concurrent edit in that window can interleave.
        let recomputed = self.recompute_unpaid_payments(&updated).await?;
        debug!(
            "Updated investment {} ({} unpaid payments recomputed)",
            updated.id, recomputed
        );

        self.sink.publish();
        Ok(updated)
    }

    async fn close_investment(&self, investment_id: &str) -> Result<Investment> {
        let mut investment = self.investment_repository.get_investment(investment_id)?;
        if !investment.is_active {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Investment {} is already closed",
                investment_id
            ))));
        }

        // Closing settles every outstanding payment as part of the
        // operation; callers never have to remember a second step.
        let payments = self.payment_repository.list_for_investment(investment_id)?;
        for mut payment in payments.into_iter().filter(|p| !p.is_paid) {
            payment.is_paid = true;
            self.payment_repository.update_payment(payment).await?;
        }

        investment.is_active = false;
        investment.closed_date = Some(Local::now().date_naive());
        let closed = self
            .investment_repository
            .update_investment(investment)
            .await?;

        info!("Closed investment {}", closed.id);
        self.sink.publish();
        Ok(closed)
    }
}
