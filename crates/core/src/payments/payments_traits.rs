use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::payments::payments_model::{NewPayment, Payment, PaymentUpdate, RollbackResult};

/// Trait for payment repository operations.
///
/// `insert_new_payment` and `update_payment` bump `last_modified` to the
/// current time; `upsert_payment` and `replace_all` store the record verbatim
/// (sync pull and import must preserve remote timestamps).
#[async_trait]
pub trait PaymentRepositoryTrait: Send + Sync {
    fn list_payments(&self) -> Result<Vec<Payment>>;
    /// Payments of one investment, sorted by due date ascending.
    fn list_for_investment(&self, investment_id: &str) -> Result<Vec<Payment>>;
    fn list_unpaid(&self) -> Result<Vec<Payment>>;
    fn get_payment(&self, payment_id: &str) -> Result<Payment>;
    /// Records with `last_modified >= cutoff`; everything when `cutoff` is `None`.
    fn list_modified_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<Payment>>;
    async fn insert_new_payment(&self, new_payment: NewPayment) -> Result<Payment>;
    async fn update_payment(&self, payment: Payment) -> Result<Payment>;
    async fn upsert_payment(&self, payment: Payment) -> Result<()>;
    /// Used only by the rollback undo operation.
    async fn delete_payment(&self, payment_id: &str) -> Result<usize>;
    /// Bulk import-replace: the only other path that physically deletes payments.
    async fn replace_all(&self, payments: Vec<Payment>) -> Result<usize>;
}

/// Trait for payment service operations, including the scheduler pass.
#[async_trait]
pub trait PaymentServiceTrait: Send + Sync {
    fn get_payments(&self) -> Result<Vec<Payment>>;
    fn get_payments_for_investment(&self, investment_id: &str) -> Result<Vec<Payment>>;
    /// Generate the next obligation for every active investment that has no
    /// outstanding unpaid payment. Idempotent per call given the same stored
    /// state; returns the newly created payments.
    async fn generate_due_payments(&self) -> Result<Vec<Payment>>;
    async fn mark_paid(&self, payment_id: &str) -> Result<Payment>;
    async fn update_payment(&self, update: PaymentUpdate) -> Result<Payment>;
    /// Undo: delete the most recent unpaid payment and reopen the most
    /// recent paid one.
    async fn rollback_last_payment(&self) -> Result<RollbackResult>;
}
