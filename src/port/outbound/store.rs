//! Persistence port for rebalance records.

use async_trait::async_trait;

use crate::domain::id::{RebalanceId, UserId};
use crate::domain::rebalance::{NewRebalanceRecord, RebalanceRecord, RebalanceUpdate};
use crate::error::Result;

/// Storage operations for rebalance history.
///
/// Implementations must reject updates to records that are no longer
/// pending so a record reaches a terminal status exactly once.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record, assigning its id.
    async fn create(&self, record: NewRebalanceRecord) -> Result<RebalanceRecord>;

    /// Apply a terminal update to a pending record.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::UnknownRecord` for a missing id and
    /// `DomainError::InvalidTransition` if the record is already terminal.
    async fn update(&self, id: &RebalanceId, update: RebalanceUpdate) -> Result<()>;

    async fn get(&self, id: &RebalanceId) -> Result<Option<RebalanceRecord>>;

    /// All records for a user, newest first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<RebalanceRecord>>;

    /// Records still awaiting an outcome, oldest first.
    async fn find_pending(&self) -> Result<Vec<RebalanceRecord>>;
}
