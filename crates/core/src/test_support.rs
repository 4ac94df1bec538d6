//! In-memory repository implementations shared by service tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{DatabaseError, Result};
use crate::investments::{Investment, InvestmentRepositoryTrait, NewInvestment};
use crate::payments::{NewPayment, Payment, PaymentRepositoryTrait};
use crate::settings::SettingsRepositoryTrait;

#[derive(Default)]
pub struct MemoryInvestmentRepository {
    items: Mutex<BTreeMap<String, Investment>>,
}

impl MemoryInvestmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, investment: Investment) {
        self.items
            .lock()
            .unwrap()
            .insert(investment.id.clone(), investment);
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for MemoryInvestmentRepository {
    fn list_investments(&self) -> Result<Vec<Investment>> {
        Ok(self.items.lock().unwrap().values().cloned().collect())
    }

    fn list_active_investments(&self) -> Result<Vec<Investment>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.is_active)
            .cloned()
            .collect())
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.items
            .lock()
            .unwrap()
            .get(investment_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(investment_id.to_string()).into())
    }

    fn list_modified_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<Investment>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| cutoff.is_none_or(|c| i.last_modified >= c))
            .cloned()
            .collect())
    }

    async fn insert_new_investment(&self, new_investment: NewInvestment) -> Result<Investment> {
        let investment = Investment {
            id: Uuid::new_v4().to_string(),
            amount: new_investment.amount,
            ratio: new_investment.ratio,
            created_date: new_investment.created_date,
            closed_date: None,
            is_active: true,
            last_modified: Utc::now(),
        };
        self.seed(investment.clone());
        Ok(investment)
    }

    async fn update_investment(&self, mut investment: Investment) -> Result<Investment> {
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&investment.id) {
            return Err(DatabaseError::NotFound(investment.id).into());
        }
        investment.last_modified = Utc::now();
        items.insert(investment.id.clone(), investment.clone());
        Ok(investment)
    }

    async fn upsert_investment(&self, investment: Investment) -> Result<()> {
        self.seed(investment);
        Ok(())
    }

    async fn replace_all(&self, investments: Vec<Investment>) -> Result<usize> {
        let mut items = self.items.lock().unwrap();
        items.clear();
        let count = investments.len();
        for investment in investments {
            items.insert(investment.id.clone(), investment);
        }
        Ok(count)
    }
}

#[derive(Default)]
pub struct MemoryPaymentRepository {
    items: Mutex<BTreeMap<String, Payment>>,
}

impl MemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, payment: Payment) {
        self.items
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
    }
}

#[async_trait]
impl PaymentRepositoryTrait for MemoryPaymentRepository {
    fn list_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.items.lock().unwrap().values().cloned().collect())
    }

    fn list_for_investment(&self, investment_id: &str) -> Result<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.invest_id == investment_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.due_date);
        Ok(payments)
    }

    fn list_unpaid(&self) -> Result<Vec<Payment>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|p| !p.is_paid)
            .cloned()
            .collect())
    }

    fn get_payment(&self, payment_id: &str) -> Result<Payment> {
        self.items
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(payment_id.to_string()).into())
    }

    fn list_modified_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<Payment>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|p| cutoff.is_none_or(|c| p.last_modified >= c))
            .cloned()
            .collect())
    }

    async fn insert_new_payment(&self, new_payment: NewPayment) -> Result<Payment> {
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            invest_id: new_payment.invest_id,
            amount: new_payment.amount,
            due_date: new_payment.due_date,
            is_paid: new_payment.is_paid,
            last_modified: Utc::now(),
        };
        self.seed(payment.clone());
        Ok(payment)
    }

    async fn update_payment(&self, mut payment: Payment) -> Result<Payment> {
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&payment.id) {
            return Err(DatabaseError::NotFound(payment.id).into());
        }
        payment.last_modified = Utc::now();
        items.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    async fn upsert_payment(&self, payment: Payment) -> Result<()> {
        self.seed(payment);
        Ok(())
    }

    async fn delete_payment(&self, payment_id: &str) -> Result<usize> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .remove(payment_id)
            .map(|_| 1)
            .unwrap_or(0))
    }

    async fn replace_all(&self, payments: Vec<Payment>) -> Result<usize> {
        let mut items = self.items.lock().unwrap();
        items.clear();
        let count = payments.len();
        for payment in payments {
            items.insert(payment.id.clone(), payment);
        }
        Ok(count)
    }
}

#[derive(Default)]
pub struct MemorySettingsRepository {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepositoryTrait for MemorySettingsRepository {
    fn get_setting(&self, setting_key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(setting_key).cloned())
    }

    async fn set_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(setting_key.to_string(), setting_value.to_string());
        Ok(())
    }
}
