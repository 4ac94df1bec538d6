use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::investments::investments_model::{Investment, InvestmentUpdate, NewInvestment};

/// Trait for investment repository operations.
///
/// `insert_new_investment` and `update_investment` bump `last_modified` to
/// the current time; `upsert_investment` and `replace_all` store the record
/// verbatim (sync pull and import must preserve remote timestamps).
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    fn list_investments(&self) -> Result<Vec<Investment>>;
    fn list_active_investments(&self) -> Result<Vec<Investment>>;
    fn get_investment(&self, investment_id: &str) -> Result<Investment>;
    /// Records with `last_modified >= cutoff`; everything when `cutoff` is `None`.
    fn list_modified_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<Investment>>;
    async fn insert_new_investment(&self, new_investment: NewInvestment) -> Result<Investment>;
    async fn update_investment(&self, investment: Investment) -> Result<Investment>;
    async fn upsert_investment(&self, investment: Investment) -> Result<()>;
    /// Bulk import-replace: the only path that physically deletes investments.
    async fn replace_all(&self, investments: Vec<Investment>) -> Result<usize>;
}

/// Trait for investment service operations.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    fn get_investments(&self) -> Result<Vec<Investment>>;
    fn get_investment(&self, investment_id: &str) -> Result<Investment>;
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment>;
    async fn update_investment(&self, update: InvestmentUpdate) -> Result<Investment>;
    async fn close_investment(&self, investment_id: &str) -> Result<Investment>;
}
