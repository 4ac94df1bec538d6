use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use moneta_core::payments::{NewPayment, Payment, PaymentRepositoryTrait};
use moneta_core::Result;

use super::model::{NewPaymentDB, PaymentDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::payments;
use crate::schema::payments::dsl::*;

pub struct PaymentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PaymentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PaymentRepository { pool, writer }
    }
}

#[async_trait]
impl PaymentRepositoryTrait for PaymentRepository {
    fn list_payments(&self) -> Result<Vec<Payment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = payments
            .order(due_date.asc())
            .load::<PaymentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    fn list_for_investment(&self, investment_id: &str) -> Result<Vec<Payment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = payments
            .filter(invest_id.eq(investment_id))
            .order(due_date.asc())
            .load::<PaymentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    fn list_unpaid(&self) -> Result<Vec<Payment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = payments
            .filter(is_paid.eq(false))
            .order(due_date.asc())
            .load::<PaymentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    fn get_payment(&self, payment_id: &str) -> Result<Payment> {
        let mut conn = get_connection(&self.pool)?;
        let row = payments
            .find(payment_id)
            .first::<PaymentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Payment::from(row))
    }

    fn list_modified_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<Payment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = match cutoff {
            Some(c) => payments
                .filter(last_modified.ge(c.naive_utc()))
                .load::<PaymentDB>(&mut conn),
            None => payments.load::<PaymentDB>(&mut conn),
        }
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    async fn insert_new_payment(&self, new_payment: NewPayment) -> Result<Payment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Payment> {
                let row = NewPaymentDB {
                    id: Uuid::new_v4().to_string(),
                    invest_id: new_payment.invest_id,
                    amount: new_payment.amount,
                    due_date: new_payment.due_date,
                    is_paid: new_payment.is_paid,
                    last_modified: Utc::now().naive_utc(),
                };
                let inserted = diesel::insert_into(payments::table)
                    .values(&row)
                    .returning(PaymentDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Payment::from(inserted))
            })
            .await
    }

    async fn update_payment(&self, payment: Payment) -> Result<Payment> {
        let payment_id = payment.id.clone();
        let mut row = PaymentDB::from(payment);
        row.last_modified = Utc::now().naive_utc();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Payment> {
                diesel::update(payments.find(payment_id.clone()))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let stored = payments
                    .find(payment_id)
                    .first::<PaymentDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Payment::from(stored))
            })
            .await
    }

    async fn upsert_payment(&self, payment: Payment) -> Result<()> {
        // Sync pull / last-write-wins: stored verbatim, remote timestamp included.
        let row = PaymentDB::from(payment);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(payments::table)
                    .values(&row)
                    .on_conflict(payments::id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn delete_payment(&self, payment_id: &str) -> Result<usize> {
        let payment_id = payment_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(payments.find(payment_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn replace_all(&self, records: Vec<Payment>) -> Result<usize> {
        let rows: Vec<PaymentDB> = records.into_iter().map(PaymentDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(payments::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let count = diesel::insert_into(payments::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(count)
            })
            .await
    }
}
