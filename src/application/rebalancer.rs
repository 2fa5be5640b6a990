//! Rebalance orchestration.
//!
//! Ties the evaluator, the retrying sentiment accessor and the execution
//! path chosen at startup into the [`RebalanceService`] entry points.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::execution::{
    select_mode, ExecutionRequest, InFlightAllocations, LiveExecutor, LivePricing,
    ModeSelection, PaperExecutor, RebalanceExecutor, TransactionMonitor, WatchedTransaction,
};
use super::sentiment::{RetryPolicy, RetryingSentiment};
use crate::domain::allocation::Allocation;
use crate::domain::asset::AssetRegistry;
use crate::domain::estimate::PaperModel;
use crate::domain::evaluator::evaluate;
use crate::domain::execution::{ExecutionMode, RebalanceResult, SimulationReport};
use crate::domain::id::UserId;
use crate::domain::rebalance::{RebalanceRecord, RebalanceUpdate};
use crate::domain::sentiment::SentimentReading;
use crate::error::{ConfigError, ExecutionError, Result};
use crate::port::inbound::rebalance::{ExecuteRequest, RebalanceService, RecoveryReport};
use crate::port::outbound::directory::UserDirectory;
use crate::port::outbound::ledger::LedgerClient;
use crate::port::outbound::metrics::{Counter, MetricsSink};
use crate::port::outbound::sentiment::SentimentProvider;
use crate::port::outbound::store::RecordStore;

/// Error stored on pending records whose monitoring window has closed.
pub const DEADLINE_ELAPSED_MESSAGE: &str =
    "confirmation deadline elapsed before outcome was observed";

/// Default bound on waiting for a confirmation.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(300);

/// The rebalance engine.
pub struct Rebalancer {
    selection: ModeSelection,
    executor: Arc<dyn RebalanceExecutor>,
    sentiment: RetryingSentiment,
    store: Arc<dyn RecordStore>,
    monitor: Option<TransactionMonitor>,
    in_flight: InFlightAllocations,
    model: PaperModel,
    metrics: Arc<dyn MetricsSink>,
    confirmation_timeout: Duration,
}

impl Rebalancer {
    #[must_use]
    pub fn builder() -> RebalancerBuilder {
        RebalancerBuilder::default()
    }

    /// Outcome of the startup probe.
    #[must_use]
    pub fn selection(&self) -> &ModeSelection {
        &self.selection
    }

    #[must_use]
    pub fn in_flight(&self) -> &InFlightAllocations {
        &self.in_flight
    }

    /// Watchers still running.
    #[must_use]
    pub fn monitors_in_flight(&self) -> usize {
        self.monitor.as_ref().map_or(0, TransactionMonitor::in_flight)
    }

    fn estimated_profit(&self, allocation: &Allocation, strategies: usize, score: u8) -> Decimal {
        if strategies == 0 {
            return Decimal::ZERO;
        }
        self.model.estimated_profit(allocation.amount, strategies, score)
    }

    async fn recover_record(&self, record: RebalanceRecord, report: &mut RecoveryReport) -> Result<()> {
        let deadline = chrono::Duration::from_std(self.confirmation_timeout)
            .map(|timeout| record.executed_at + timeout)
            .unwrap_or(record.executed_at);
        let remaining = (deadline - Utc::now()).to_std().unwrap_or(Duration::ZERO);

        let Some(tx_hash) = record.tx_hash.clone().filter(|_| !remaining.is_zero()) else {
            match self
                .store
                .update(&record.id, RebalanceUpdate::failed(DEADLINE_ELAPSED_MESSAGE))
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_already_terminal() => {
                    info!(record_id = %record.id, "Pending record settled before recovery reached it");
                    report.skipped += 1;
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
            self.metrics.increment(Counter::ConfirmationsFailed);
            warn!(record_id = %record.id, "Pending record expired during recovery");
            report.expired += 1;
            return Ok(());
        };

        let Some(monitor) = &self.monitor else {
            report.skipped += 1;
            return Ok(());
        };
        let Some(lease) = self.in_flight.try_acquire(&record.allocation_id) else {
            report.skipped += 1;
            return Ok(());
        };

        info!(
            record_id = %record.id,
            tx_hash = %tx_hash,
            remaining_secs = remaining.as_secs(),
            "Re-attaching monitor to pending record"
        );
        monitor.watch(WatchedTransaction {
            record_id: record.id,
            tx_hash,
            timeout: remaining,
            lease: Some(lease),
        });
        report.reattached += 1;
        Ok(())
    }
}

#[async_trait]
impl RebalanceService for Rebalancer {
    fn mode(&self) -> ExecutionMode {
        self.executor.mode()
    }

    async fn simulate(
        &self,
        allocation: &Allocation,
        sentiment: &SentimentReading,
    ) -> Result<SimulationReport> {
        allocation.validate()?;
        sentiment.validate()?;

        let active = evaluate(&allocation.layers, sentiment);
        let profit = self.estimated_profit(allocation, active.len(), sentiment.score);
        Ok(SimulationReport::new(active, self.model.gas_cost_usd, profit))
    }

    async fn execute(&self, request: ExecuteRequest) -> Result<RebalanceResult> {
        let ExecuteRequest {
            allocation,
            sentiment,
            trigger,
        } = request;
        self.metrics.increment(Counter::ExecutionsRequested);
        allocation.validate()?;

        let sentiment = match sentiment {
            Some(reading) => {
                reading.validate()?;
                reading
            }
            None => self.sentiment.get().await,
        };

        let active_strategies = evaluate(&allocation.layers, &sentiment);
        if active_strategies.is_empty() {
            info!(
                allocation_id = %allocation.id,
                score = sentiment.score,
                "No strategy conditions met, nothing to execute"
            );
            return Ok(RebalanceResult::skipped(self.mode(), &sentiment));
        }

        let lease = self.in_flight.try_acquire(&allocation.id).ok_or_else(|| {
            ExecutionError::AlreadyInFlight {
                allocation_id: allocation.id.to_string(),
            }
        })?;

        self.executor
            .execute(ExecutionRequest {
                allocation,
                sentiment,
                active_strategies,
                trigger,
                lease,
            })
            .await
    }

    async fn sentiment(&self) -> SentimentReading {
        self.sentiment.get().await
    }

    async fn history(&self, user_id: &UserId) -> Result<Vec<RebalanceRecord>> {
        self.store.find_by_user(user_id).await
    }

    async fn recover_pending(&self) -> Result<RecoveryReport> {
        let mut report = RecoveryReport::default();
        for record in self.store.find_pending().await? {
            let record_id = record.id.clone();
            if let Err(e) = self.recover_record(record, &mut report).await {
                warn!(record_id = %record_id, error = %e, "Recovery of pending record failed");
                report.failed += 1;
            }
        }
        info!(
            reattached = report.reattached,
            expired = report.expired,
            skipped = report.skipped,
            failed = report.failed,
            "Pending recovery complete"
        );
        Ok(report)
    }

    async fn drain_monitors(&self) {
        if let Some(monitor) = &self.monitor {
            monitor.drain().await;
        }
    }
}

/// Builder for [`Rebalancer`].
///
/// Store, directory and metrics are required. Without a ledger client the
/// engine runs in paper mode.
pub struct RebalancerBuilder {
    store: Option<Arc<dyn RecordStore>>,
    directory: Option<Arc<dyn UserDirectory>>,
    metrics: Option<Arc<dyn MetricsSink>>,
    ledger: Option<Arc<dyn LedgerClient>>,
    sentiment: Option<Arc<dyn SentimentProvider>>,
    retry: RetryPolicy,
    assets: AssetRegistry,
    model: PaperModel,
    native_price_usd: Decimal,
    confirmation_timeout: Duration,
}

impl Default for RebalancerBuilder {
    fn default() -> Self {
        Self {
            store: None,
            directory: None,
            metrics: None,
            ledger: None,
            sentiment: None,
            retry: RetryPolicy::default(),
            assets: AssetRegistry::default(),
            model: PaperModel::default(),
            native_price_usd: Decimal::ZERO,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }
}

impl RebalancerBuilder {
    #[must_use]
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn ledger(mut self, ledger: Option<Arc<dyn LedgerClient>>) -> Self {
        self.ledger = ledger;
        self
    }

    #[must_use]
    pub fn sentiment_provider(mut self, provider: Option<Arc<dyn SentimentProvider>>) -> Self {
        self.sentiment = provider;
        self
    }

    #[must_use]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn assets(mut self, assets: AssetRegistry) -> Self {
        self.assets = assets;
        self
    }

    #[must_use]
    pub fn paper_model(mut self, model: PaperModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn native_price_usd(mut self, price: Decimal) -> Self {
        self.native_price_usd = price;
        self
    }

    #[must_use]
    pub fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Probe the ledger once and assemble the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if a required collaborator was
    /// not supplied.
    pub async fn build(self) -> Result<Rebalancer> {
        let store = self
            .store
            .ok_or(ConfigError::MissingField { field: "store" })?;
        let directory = self
            .directory
            .ok_or(ConfigError::MissingField { field: "directory" })?;
        let metrics = self
            .metrics
            .ok_or(ConfigError::MissingField { field: "metrics" })?;

        let selection = select_mode(self.ledger.as_ref()).await;
        let monitor = self.ledger.as_ref().map(|ledger| {
            TransactionMonitor::new(
                Arc::clone(ledger),
                Arc::clone(&store),
                Arc::clone(&metrics),
                self.native_price_usd,
            )
        });

        let executor: Arc<dyn RebalanceExecutor> = match (&selection, &self.ledger, &monitor) {
            (ModeSelection::Live { .. }, Some(ledger), Some(monitor)) => Arc::new(LiveExecutor::new(
                Arc::clone(ledger),
                Arc::clone(&store),
                directory,
                self.assets,
                monitor.clone(),
                LivePricing {
                    native_price_usd: self.native_price_usd,
                    fallback_gas_cost_usd: self.model.gas_cost_usd,
                    confirmation_timeout: self.confirmation_timeout,
                },
                Arc::clone(&metrics),
            )),
            _ => Arc::new(PaperExecutor::new(
                Arc::clone(&store),
                self.model,
                Arc::clone(&metrics),
            )),
        };

        Ok(Rebalancer {
            selection,
            executor,
            sentiment: RetryingSentiment::new(self.sentiment, self.retry, Arc::clone(&metrics)),
            store,
            monitor,
            in_flight: InFlightAllocations::new(),
            model: self.model,
            metrics,
            confirmation_timeout: self.confirmation_timeout,
        })
    }
}
