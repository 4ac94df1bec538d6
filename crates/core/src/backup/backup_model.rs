//! Backup payload model.

use serde::{Deserialize, Serialize};

use crate::investments::Investment;
use crate::payments::Payment;

/// Complete snapshot of both record collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub invests: Vec<Investment>,
    pub payments: Vec<Payment>,
}
