//! Database models for investments.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use moneta_core::investments::Investment;

/// Database model for investments.
#[derive(
    Queryable,
    Insertable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDB {
    pub id: String,
    pub amount: f64,
    pub ratio: Option<f64>,
    pub created_date: NaiveDate,
    pub closed_date: Option<NaiveDate>,
    pub is_active: bool,
    pub last_modified: NaiveDateTime,
}

/// Database model for inserting a new investment (id and timestamp assigned
/// by the repository).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::investments)]
pub struct NewInvestmentDB {
    pub id: String,
    pub amount: f64,
    pub ratio: Option<f64>,
    pub created_date: NaiveDate,
    pub closed_date: Option<NaiveDate>,
    pub is_active: bool,
    pub last_modified: NaiveDateTime,
}

// Conversion to/from domain models

impl From<InvestmentDB> for Investment {
    fn from(db: InvestmentDB) -> Self {
        Self {
            id: db.id,
            amount: db.amount,
            ratio: db.ratio,
            created_date: db.created_date,
            closed_date: db.closed_date,
            is_active: db.is_active,
            last_modified: DateTime::<Utc>::from_naive_utc_and_offset(db.last_modified, Utc),
        }
    }
}

impl From<Investment> for InvestmentDB {
    fn from(domain: Investment) -> Self {
        Self {
            id: domain.id,
            amount: domain.amount,
            ratio: domain.ratio,
            created_date: domain.created_date,
            closed_date: domain.closed_date,
            is_active: domain.is_active,
            last_modified: domain.last_modified.naive_utc(),
        }
    }
}
