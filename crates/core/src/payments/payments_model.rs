//! Payment domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Domain model representing one scheduled interest obligation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    /// Owning investment. Immutable after creation.
    pub invest_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    /// Monotonic false -> true, except for the explicit rollback operation.
    pub is_paid: bool,
    /// Bumped on every mutation, never on read. The sole sync cursor.
    pub last_modified: DateTime<Utc>,
}

/// Input model for a payment created by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub invest_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub is_paid: bool,
}

/// Input model for editing a payment's amount and/or due date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub id: String,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
}

/// Outcome of the "rollback last payment" undo operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackResult {
    /// The unpaid payment that was physically deleted.
    pub removed: Payment,
    /// The previously paid payment that was reopened, if any existed.
    pub reopened: Option<Payment>,
}
