//! Transaction lifecycle monitor.
//!
//! One background task per submitted transaction waits for a receipt,
//! then applies exactly one terminal update to the record that was handed
//! over. Each watcher runs under a supervisor so a panic still ends in a
//! `failed` record instead of a stuck `pending` one.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::guard::AllocationLease;
use crate::domain::estimate::gas_cost;
use crate::domain::id::RebalanceId;
use crate::domain::rebalance::RebalanceUpdate;
use crate::domain::transaction::TransactionOutcome;
use crate::error::LedgerError;
use crate::port::outbound::ledger::{LedgerClient, ReceiptStatus};
use crate::port::outbound::metrics::{Counter, MetricsSink};
use crate::port::outbound::store::RecordStore;

/// Attempts at writing a terminal update before giving up.
pub const STORE_UPDATE_ATTEMPTS: u32 = 5;

/// Delay before the first store retry; doubles on each further attempt.
pub const STORE_RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Error stored when a watcher task dies unexpectedly.
pub const MONITOR_PANIC_MESSAGE: &str = "transaction monitor crashed before an outcome was recorded";

/// Single-owner handle on a submitted transaction.
#[derive(Debug)]
pub struct WatchedTransaction {
    pub record_id: RebalanceId,
    pub tx_hash: String,
    /// Time left before the record must be terminal.
    pub timeout: Duration,
    pub lease: Option<AllocationLease>,
}

#[derive(Clone)]
struct MonitorContext {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn RecordStore>,
    metrics: Arc<dyn MetricsSink>,
    native_price_usd: Decimal,
}

/// Spawns and tracks confirmation watchers.
#[derive(Clone)]
pub struct TransactionMonitor {
    context: MonitorContext,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl TransactionMonitor {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn RecordStore>,
        metrics: Arc<dyn MetricsSink>,
        native_price_usd: Decimal,
    ) -> Self {
        Self {
            context: MonitorContext {
                ledger,
                store,
                metrics,
                native_price_usd,
            },
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start watching `watched` in the background and return immediately.
    pub fn watch(&self, watched: WatchedTransaction) {
        let context = self.context.clone();
        let handle = tokio::spawn(supervise(context, watched));

        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Number of watchers that have not finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Wait until every watcher, including ones started while draining, ends.
    pub async fn drain(&self) {
        loop {
            let pending = std::mem::take(&mut *self.tasks.lock());
            if pending.is_empty() {
                return;
            }
            for task in pending {
                if let Err(e) = task.await {
                    warn!(error = %e, "Monitor supervisor did not complete");
                }
            }
        }
    }
}

async fn supervise(context: MonitorContext, watched: WatchedTransaction) {
    let record_id = watched.record_id.clone();
    let tx_hash = watched.tx_hash.clone();

    let watcher = tokio::spawn(observe(context.clone(), watched));
    match watcher.await {
        Ok(()) => {}
        Err(e) if e.is_panic() => {
            error!(
                record_id = %record_id,
                tx_hash = %tx_hash,
                "Transaction monitor panicked"
            );
            context.metrics.increment(Counter::ConfirmationsFailed);
            apply(&context, &record_id, RebalanceUpdate::failed(MONITOR_PANIC_MESSAGE)).await;
        }
        Err(e) => {
            warn!(record_id = %record_id, error = %e, "Transaction monitor cancelled");
        }
    }
}

async fn observe(context: MonitorContext, watched: WatchedTransaction) {
    let WatchedTransaction {
        record_id,
        tx_hash,
        timeout,
        lease,
    } = watched;

    let outcome = wait_for_outcome(&context, &tx_hash, timeout).await;
    if outcome.is_success() {
        context.metrics.increment(Counter::ConfirmationsSucceeded);
        info!(
            record_id = %record_id,
            tx_hash = %tx_hash,
            gas_used = ?outcome.gas_used,
            gas_cost_usd = ?outcome.gas_cost_usd,
            "Rebalance confirmed"
        );
    } else {
        context.metrics.increment(Counter::ConfirmationsFailed);
        error!(
            record_id = %record_id,
            tx_hash = %tx_hash,
            error = outcome.error.as_deref().unwrap_or_default(),
            "Rebalance failed"
        );
    }

    apply(&context, &record_id, outcome.to_update()).await;
    drop(lease);
}

async fn wait_for_outcome(
    context: &MonitorContext,
    tx_hash: &str,
    timeout: Duration,
) -> TransactionOutcome {
    let wait = context.ledger.wait_for_confirmation(tx_hash, timeout);
    let confirmation = match tokio::time::timeout(timeout, wait).await {
        Ok(Ok(confirmation)) => confirmation,
        Ok(Err(e)) => return TransactionOutcome::failed(tx_hash, e.to_string()),
        Err(_) => {
            let e = LedgerError::Timeout {
                secs: timeout.as_secs(),
            };
            return TransactionOutcome::failed(tx_hash, e.to_string());
        }
    };

    let cost = gas_cost(
        confirmation.gas_used,
        confirmation.gas_price_wei,
        context.native_price_usd,
    );
    match confirmation.status {
        ReceiptStatus::Success => TransactionOutcome::confirmed(tx_hash, confirmation.gas_used, cost),
        ReceiptStatus::Reverted => {
            let reason = LedgerError::Reverted {
                tx_hash: tx_hash.to_string(),
                block: confirmation
                    .block_number
                    .map_or_else(|| "unknown".to_string(), |b| b.to_string()),
            };
            TransactionOutcome::failed(tx_hash, reason.to_string())
                .with_gas(confirmation.gas_used, cost)
        }
    }
}

/// Write the terminal update, retrying transient store failures.
async fn apply(context: &MonitorContext, record_id: &RebalanceId, update: RebalanceUpdate) {
    let mut delay = STORE_RETRY_BASE_DELAY;
    for attempt in 1..=STORE_UPDATE_ATTEMPTS {
        match context.store.update(record_id, update.clone()).await {
            Ok(()) => return,
            Err(e) if e.is_already_terminal() => {
                warn!(record_id = %record_id, error = %e, "Record already terminal, outcome dropped");
                return;
            }
            Err(e) if e.is_transient() && attempt < STORE_UPDATE_ATTEMPTS => {
                warn!(
                    record_id = %record_id,
                    attempt,
                    retry_in = ?delay,
                    error = %e,
                    "Recording transaction outcome failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
            Err(e) => {
                error!(
                    record_id = %record_id,
                    attempt,
                    error = %e,
                    "Failed to record transaction outcome; record stays pending until recovery"
                );
                return;
            }
        }
    }
}
