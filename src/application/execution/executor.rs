//! Execution strategy selected once at startup.

use async_trait::async_trait;

use super::guard::AllocationLease;
use crate::domain::allocation::Allocation;
use crate::domain::execution::{ExecutionMode, RebalanceResult};
use crate::domain::id::StrategyId;
use crate::domain::rebalance::TriggerType;
use crate::domain::sentiment::SentimentReading;
use crate::error::Result;

/// A validated execution attempt with at least one active strategy.
#[derive(Debug)]
pub struct ExecutionRequest {
    pub allocation: Allocation,
    pub sentiment: SentimentReading,
    pub active_strategies: Vec<StrategyId>,
    pub trigger: TriggerType,
    /// Held until the attempt reaches a terminal outcome.
    pub lease: AllocationLease,
}

/// Paper or live execution path.
#[async_trait]
pub trait RebalanceExecutor: Send + Sync {
    fn mode(&self) -> ExecutionMode;

    async fn execute(&self, request: ExecutionRequest) -> Result<RebalanceResult>;
}
