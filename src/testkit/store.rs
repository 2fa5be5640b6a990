//! In-memory record store.
//!
//! Mirrors the SQLite store's contract: ids are assigned on create and only
//! `pending` records accept a terminal update. Updates can be scripted to
//! fail the way a locked database does.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::allocation::Allocation;
use crate::domain::id::{RebalanceId, UserId};
use crate::domain::rebalance::{
    NewRebalanceRecord, RebalanceRecord, RebalanceStatus, RebalanceUpdate, TriggerType,
};
use crate::domain::sentiment::SentimentReading;
use crate::error::{Error, ExecutionError, Result};
use crate::port::outbound::store::RecordStore;

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<RebalanceRecord>>,
    failing_updates: AtomicUsize,
    update_calls: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` calls to `update` fail with a database error.
    pub fn fail_next_updates(&self, count: usize) {
        self.failing_updates.store(count, Ordering::SeqCst);
    }

    /// Number of `update` calls, failed ones included.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every record in insertion order.
    pub fn records(&self) -> Vec<RebalanceRecord> {
        self.records.lock().clone()
    }

    pub fn record(&self, id: &RebalanceId) -> Option<RebalanceRecord> {
        self.records.lock().iter().find(|r| &r.id == id).cloned()
    }

    /// Records with the given status, in insertion order.
    pub fn with_status(&self, status: RebalanceStatus) -> Vec<RebalanceRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    /// Seed a pending live record as a previous process would have left it.
    pub fn insert_pending(
        &self,
        allocation: &Allocation,
        tx_hash: &str,
        executed_at: DateTime<Utc>,
    ) -> RebalanceId {
        let mut new = NewRebalanceRecord::attempt(
            allocation,
            &SentimentReading::neutral_fallback(),
            TriggerType::Manual,
        );
        new.tx_hash = Some(tx_hash.to_string());
        new.executed_at = executed_at;

        let id = RebalanceId::generate();
        self.records.lock().push(new.into_record(id.clone()));
        id
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, record: NewRebalanceRecord) -> Result<RebalanceRecord> {
        let record = record.into_record(RebalanceId::generate());
        self.records.lock().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RebalanceId, update: RebalanceUpdate) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failing_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(Error::Database("database is locked".to_string()));
        }

        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| ExecutionError::UnknownRecord(id.clone()))?;
        record.apply(&update)?;
        Ok(())
    }

    async fn get(&self, id: &RebalanceId) -> Result<Option<RebalanceRecord>> {
        Ok(self.record(id))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<RebalanceRecord>> {
        let mut found: Vec<_> = self
            .records
            .lock()
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        Ok(found)
    }

    async fn find_pending(&self) -> Result<Vec<RebalanceRecord>> {
        let mut found: Vec<_> = self
            .records
            .lock()
            .iter()
            .filter(|r| r.status == RebalanceStatus::Pending)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.executed_at.cmp(&b.executed_at));
        Ok(found)
    }
}
