use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use moneta_core::investments::{Investment, InvestmentRepositoryTrait, NewInvestment};
use moneta_core::Result;

use super::model::{InvestmentDB, NewInvestmentDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::investments;
use crate::schema::investments::dsl::*;

pub struct InvestmentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        InvestmentRepository { pool, writer }
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    fn list_investments(&self) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = investments
            .order(created_date.asc())
            .load::<InvestmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Investment::from).collect())
    }

    fn list_active_investments(&self) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = investments
            .filter(is_active.eq(true))
            .order(created_date.asc())
            .load::<InvestmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Investment::from).collect())
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        let mut conn = get_connection(&self.pool)?;
        let row = investments
            .find(investment_id)
            .first::<InvestmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Investment::from(row))
    }

    fn list_modified_since(&self, cutoff: Option<DateTime<Utc>>) -> Result<Vec<Investment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = match cutoff {
            Some(c) => investments
                .filter(last_modified.ge(c.naive_utc()))
                .load::<InvestmentDB>(&mut conn),
            None => investments.load::<InvestmentDB>(&mut conn),
        }
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Investment::from).collect())
    }

    async fn insert_new_investment(&self, new_investment: NewInvestment) -> Result<Investment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Investment> {
                let row = NewInvestmentDB {
                    id: Uuid::new_v4().to_string(),
                    amount: new_investment.amount,
                    ratio: new_investment.ratio,
                    created_date: new_investment.created_date,
                    closed_date: None,
                    is_active: true,
                    last_modified: Utc::now().naive_utc(),
                };
                let inserted = diesel::insert_into(investments::table)
                    .values(&row)
                    .returning(InvestmentDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Investment::from(inserted))
            })
            .await
    }

    async fn update_investment(&self, investment: Investment) -> Result<Investment> {
        let investment_id = investment.id.clone();
        let mut row = InvestmentDB::from(investment);
        row.last_modified = Utc::now().naive_utc();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Investment> {
                diesel::update(investments.find(investment_id.clone()))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let stored = investments
                    .find(investment_id)
                    .first::<InvestmentDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Investment::from(stored))
            })
            .await
    }

    async fn upsert_investment(&self, investment: Investment) -> Result<()> {
        // Sync pull / last-write-wins: the record is stored verbatim,
        // remote timestamp included.
        let row = InvestmentDB::from(investment);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(investments::table)
                    .values(&row)
                    .on_conflict(investments::id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn replace_all(&self, records: Vec<Investment>) -> Result<usize> {
        let rows: Vec<InvestmentDB> = records.into_iter().map(InvestmentDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(investments::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let count = diesel::insert_into(investments::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(count)
            })
            .await
    }
}
