//! Wire types for the remote store API.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use moneta_core::investments::Investment;
use moneta_core::payments::Payment;

/// `status` value carried by successful pull/push responses.
pub const STATUS_SUCCESS: &str = "success";
/// `status` value when the server has nothing newer than the cursor.
pub const STATUS_NO_UPDATES: &str = "no_updates";

/// Investment record as exchanged with the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestDto {
    pub id: String,
    pub amount: f64,
    pub ratio: Option<f64>,
    pub created_date: NaiveDate,
    pub closed_date: Option<NaiveDate>,
    pub is_active: bool,
    pub last_modified: DateTime<Utc>,
}

/// Payment record as exchanged with the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: String,
    pub invest_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub last_modified: DateTime<Utc>,
}

/// Response to `GET /updates?since=...`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    pub status: String,
    #[serde(default)]
    pub invests: Option<Vec<InvestDto>>,
    #[serde(default)]
    pub payments: Option<Vec<PaymentDto>>,
}

/// Body of `POST /update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub invests: Vec<InvestDto>,
    pub payments: Vec<PaymentDto>,
}

/// Response to `POST /update`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    pub status: String,
}

/// Body of `POST /login` and `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response to the auth endpoints: a bearer token on success, an error code
/// (plus optional per-field messages) on failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

// Conversion to/from domain models

impl From<Investment> for InvestDto {
    fn from(domain: Investment) -> Self {
        Self {
            id: domain.id,
            amount: domain.amount,
            ratio: domain.ratio,
            created_date: domain.created_date,
            closed_date: domain.closed_date,
            is_active: domain.is_active,
            last_modified: domain.last_modified,
        }
    }
}

impl From<InvestDto> for Investment {
    fn from(dto: InvestDto) -> Self {
        Self {
            id: dto.id,
            amount: dto.amount,
            ratio: dto.ratio,
            created_date: dto.created_date,
            closed_date: dto.closed_date,
            is_active: dto.is_active,
            last_modified: dto.last_modified,
        }
    }
}

impl From<Payment> for PaymentDto {
    fn from(domain: Payment) -> Self {
        Self {
            id: domain.id,
            invest_id: domain.invest_id,
            amount: domain.amount,
            due_date: domain.due_date,
            is_paid: domain.is_paid,
            last_modified: domain.last_modified,
        }
    }
}

impl From<PaymentDto> for Payment {
    fn from(dto: PaymentDto) -> Self {
        Self {
            id: dto.id,
            invest_id: dto.invest_id,
            amount: dto.amount,
            due_date: dto.due_date,
            is_paid: dto.is_paid,
            last_modified: dto.last_modified,
        }
    }
}
