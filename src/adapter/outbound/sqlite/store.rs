//! SQLite rebalance record store.
//!
//! Monetary values are stored as decimal text and timestamps as RFC 3339
//! with microsecond precision so lexical order matches time order.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::database::connection::DbPool;
use super::database::model::{RebalanceChangeset, RebalanceRow};
use super::database::schema::rebalances;
use crate::domain::error::DomainError;
use crate::domain::id::{AllocationId, RebalanceId, UserId};
use crate::domain::rebalance::{
    NewRebalanceRecord, RebalanceRecord, RebalanceStatus, RebalanceUpdate, TriggerType,
};
use crate::domain::sentiment::SentimentLabel;
use crate::error::{Error, ExecutionError, Result};
use crate::port::outbound::store::RecordStore;

/// SQLite-backed [`RecordStore`].
pub struct SqliteRecordStore {
    pool: DbPool,
}

impl SqliteRecordStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(record: &RebalanceRecord) -> RebalanceRow {
        RebalanceRow {
            id: record.id.to_string(),
            user_id: record.user_id.to_string(),
            allocation_id: record.allocation_id.to_string(),
            ecosystem: record.ecosystem.clone(),
            asset_id: record.asset_id.clone(),
            trigger_type: record.trigger_type.as_str().to_string(),
            sentiment_score: i32::from(record.sentiment_score),
            sentiment_label: record.sentiment_label.as_str().to_string(),
            gas_cost_usd: record.gas_cost_usd.map(|d| d.to_string()),
            profit_usd: record.profit_usd.map(|d| d.to_string()),
            tx_hash: record.tx_hash.clone(),
            status: record.status.as_str().to_string(),
            error_message: record.error_message.clone(),
            executed_at: record
                .executed_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    fn from_row(row: RebalanceRow) -> Result<RebalanceRecord> {
        let sentiment_score = u8::try_from(row.sentiment_score)
            .map_err(|_| Error::Parse(format!("sentiment score {}", row.sentiment_score)))?;
        let executed_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.executed_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(RebalanceRecord {
            id: RebalanceId::from(row.id),
            user_id: UserId::from(row.user_id),
            allocation_id: AllocationId::from(row.allocation_id),
            ecosystem: row.ecosystem,
            asset_id: row.asset_id,
            trigger_type: TriggerType::from_str(&row.trigger_type)?,
            sentiment_score,
            sentiment_label: SentimentLabel::from_str(&row.sentiment_label)?,
            gas_cost_usd: parse_decimal(row.gas_cost_usd)?,
            profit_usd: parse_decimal(row.profit_usd)?,
            tx_hash: row.tx_hash,
            status: RebalanceStatus::from_str(&row.status)?,
            error_message: row.error_message,
            executed_at,
        })
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }
}

fn parse_decimal(value: Option<String>) -> Result<Option<Decimal>> {
    value
        .map(|v| Decimal::from_str(&v).map_err(|e| Error::Parse(format!("decimal '{v}': {e}"))))
        .transpose()
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, record: NewRebalanceRecord) -> Result<RebalanceRecord> {
        let row = Self::to_row(&record.into_record(RebalanceId::generate()));
        let mut conn = self.connection()?;

        diesel::insert_into(rebalances::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Self::from_row(row)
    }

    async fn update(&self, id: &RebalanceId, update: RebalanceUpdate) -> Result<()> {
        if !update.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: RebalanceStatus::Pending,
                to: update.status,
            }
            .into());
        }

        let changeset = RebalanceChangeset {
            status: update.status.as_str().to_string(),
            gas_cost_usd: update.gas_cost_usd.map(|d| d.to_string()),
            profit_usd: update.profit_usd.map(|d| d.to_string()),
            error_message: update.error_message,
        };
        let mut conn = self.connection()?;

        let updated = diesel::update(
            rebalances::table
                .filter(rebalances::id.eq(id.as_str()))
                .filter(rebalances::status.eq(RebalanceStatus::Pending.as_str())),
        )
        .set(&changeset)
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;

        if updated > 0 {
            return Ok(());
        }

        let current: Option<String> = rebalances::table
            .find(id.as_str())
            .select(rebalances::status)
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        match current {
            None => Err(ExecutionError::UnknownRecord(id.clone()).into()),
            Some(status) => Err(DomainError::InvalidTransition {
                from: RebalanceStatus::from_str(&status)?,
                to: update.status,
            }
            .into()),
        }
    }

    async fn get(&self, id: &RebalanceId) -> Result<Option<RebalanceRecord>> {
        let mut conn = self.connection()?;

        let row: Option<RebalanceRow> = rebalances::table
            .find(id.as_str())
            .select(RebalanceRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<RebalanceRecord>> {
        let mut conn = self.connection()?;

        let rows: Vec<RebalanceRow> = rebalances::table
            .filter(rebalances::user_id.eq(user_id.as_str()))
            .order((rebalances::executed_at.desc(), rebalances::id.desc()))
            .select(RebalanceRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn find_pending(&self) -> Result<Vec<RebalanceRecord>> {
        let mut conn = self.connection()?;

        let rows: Vec<RebalanceRow> = rebalances::table
            .filter(rebalances::status.eq(RebalanceStatus::Pending.as_str()))
            .order(rebalances::executed_at.asc())
            .select(RebalanceRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
