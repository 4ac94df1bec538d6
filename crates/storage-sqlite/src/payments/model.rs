//! Database models for payments.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use moneta_core::payments::Payment;

use crate::investments::InvestmentDB;

/// Database model for payments.
#[derive(
    Queryable,
    Insertable,
    Identifiable,
    Associations,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(InvestmentDB, foreign_key = invest_id))]
#[diesel(table_name = crate::schema::payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PaymentDB {
    pub id: String,
    pub invest_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub last_modified: NaiveDateTime,
}

/// Database model for inserting a scheduler-created payment.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPaymentDB {
    pub id: String,
    pub invest_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub last_modified: NaiveDateTime,
}

// Conversion to/from domain models

impl From<PaymentDB> for Payment {
    fn from(db: PaymentDB) -> Self {
        Self {
            id: db.id,
            invest_id: db.invest_id,
            amount: db.amount,
            due_date: db.due_date,
            is_paid: db.is_paid,
            last_modified: DateTime::<Utc>::from_naive_utc_and_offset(db.last_modified, Utc),
        }
    }
}

impl From<Payment> for PaymentDB {
    fn from(domain: Payment) -> Self {
        Self {
            id: domain.id,
            invest_id: domain.invest_id,
            amount: domain.amount,
            due_date: domain.due_date,
            is_paid: domain.is_paid,
            last_modified: domain.last_modified.naive_utc(),
        }
    }
}
