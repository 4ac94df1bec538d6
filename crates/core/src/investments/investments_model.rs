//! Investment domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_INCOME_RATIO;

/// Domain model representing an interest-bearing deposit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    /// Principal amount. Always positive.
    pub amount: f64,
    /// Income ratio per billing cycle. `None` means the default applies.
    pub ratio: Option<f64>,
    /// Anchors the billing day-of-month for all future payments.
    pub created_date: NaiveDate,
    /// Set exactly once, when the investment is closed.
    pub closed_date: Option<NaiveDate>,
    pub is_active: bool,
    /// Bumped on every mutation, never on read. The sole sync cursor.
    pub last_modified: DateTime<Utc>,
}

impl Investment {
    /// Effective income ratio, falling back to the default when none is set.
    pub fn effective_ratio(&self) -> f64 {
        self.ratio.unwrap_or(DEFAULT_INCOME_RATIO)
    }
}

/// Input model for creating a new investment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub amount: f64,
    pub ratio: Option<f64>,
    pub created_date: NaiveDate,
}

/// Input model for editing an investment's principal and/or start date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentUpdate {
    pub id: String,
    pub amount: f64,
    pub created_date: Option<NaiveDate>,
}
