//! Rebalance service port.
//!
//! The two entry points exposed to the request layer: a side-effect free
//! preview and the full execution pipeline. History and recovery helpers
//! sit alongside them for operator tooling.

use async_trait::async_trait;

use crate::domain::allocation::Allocation;
use crate::domain::execution::{ExecutionMode, RebalanceResult, SimulationReport};
use crate::domain::id::UserId;
use crate::domain::rebalance::{RebalanceRecord, TriggerType};
use crate::domain::sentiment::SentimentReading;
use crate::error::Result;

/// Input to [`RebalanceService::execute`].
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    pub allocation: Allocation,
    /// Reading to evaluate against; fetched with retries when absent.
    pub sentiment: Option<SentimentReading>,
    pub trigger: TriggerType,
}

impl ExecuteRequest {
    #[must_use]
    pub fn new(allocation: Allocation) -> Self {
        Self {
            allocation,
            sentiment: None,
            trigger: TriggerType::Manual,
        }
    }

    #[must_use]
    pub fn with_sentiment(mut self, sentiment: SentimentReading) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerType) -> Self {
        self.trigger = trigger;
        self
    }
}

/// Summary of a pending-record recovery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Records handed back to a monitor.
    pub reattached: usize,
    /// Records failed because their deadline had passed.
    pub expired: usize,
    /// Records left pending: no ledger to observe them, or already watched.
    pub skipped: usize,
    /// Records whose recovery errored; they stay pending for the next pass.
    pub failed: usize,
}

#[async_trait]
pub trait RebalanceService: Send + Sync {
    /// Mode chosen at startup.
    fn mode(&self) -> ExecutionMode;

    /// Preview an execution. Never persists and never touches the ledger.
    async fn simulate(
        &self,
        allocation: &Allocation,
        sentiment: &SentimentReading,
    ) -> Result<SimulationReport>;

    /// Evaluate, execute and record a rebalance.
    async fn execute(&self, request: ExecuteRequest) -> Result<RebalanceResult>;

    /// Current sentiment through the retrying provider.
    async fn sentiment(&self) -> SentimentReading;

    /// A user's rebalance history, newest first.
    async fn history(&self, user_id: &UserId) -> Result<Vec<RebalanceRecord>>;

    /// Resume monitoring of records left pending by a previous process.
    async fn recover_pending(&self) -> Result<RecoveryReport>;

    /// Wait for every in-flight monitor to finish.
    async fn drain_monitors(&self);
}
