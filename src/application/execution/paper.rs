//! Paper trading path: synthesize an outcome and record it as final.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::executor::{ExecutionRequest, RebalanceExecutor};
use crate::domain::estimate::PaperModel;
use crate::domain::execution::{ExecutionMode, RebalanceResult};
use crate::domain::rebalance::{paper_tx_hash, NewRebalanceRecord};
use crate::error::Result;
use crate::port::outbound::metrics::{Counter, MetricsSink};
use crate::port::outbound::store::RecordStore;

pub struct PaperExecutor {
    store: Arc<dyn RecordStore>,
    model: PaperModel,
    metrics: Arc<dyn MetricsSink>,
}

impl PaperExecutor {
    pub fn new(store: Arc<dyn RecordStore>, model: PaperModel, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            store,
            model,
            metrics,
        }
    }
}

#[async_trait]
impl RebalanceExecutor for PaperExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Paper
    }

    async fn execute(&self, request: ExecutionRequest) -> Result<RebalanceResult> {
        let ExecutionRequest {
            allocation,
            sentiment,
            active_strategies,
            trigger,
            lease: _lease,
        } = request;

        let gas_cost = self.model.gas_cost_usd;
        let profit = self.model.estimated_profit(
            allocation.amount,
            active_strategies.len(),
            sentiment.score,
        );
        let tx_hash = paper_tx_hash();

        let record = self
            .store
            .create(
                NewRebalanceRecord::attempt(&allocation, &sentiment, trigger)
                    .succeeded(tx_hash.clone(), gas_cost, profit),
            )
            .await?;
        self.metrics.increment(Counter::PaperExecutions);

        info!(
            mode = "paper",
            record_id = %record.id,
            user_id = %allocation.user_id,
            allocation_id = %allocation.id,
            tx_hash = %tx_hash,
            strategies = active_strategies.len(),
            profit = %profit,
            "Paper rebalance recorded"
        );

        Ok(RebalanceResult {
            executed: true,
            mode: ExecutionMode::Paper,
            active_strategies,
            sentiment_score: sentiment.score,
            sentiment_label: sentiment.label,
            record_id: Some(record.id),
            tx_hash: Some(tx_hash),
            status: Some(record.status),
            estimated_gas_cost_usd: gas_cost,
            estimated_profit_usd: profit,
        })
    }
}
