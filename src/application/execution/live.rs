//! Live execution coordinator.
//!
//! Resolves the wallet and asset, prices gas, submits through the keeper
//! and hands the pending record to the [`TransactionMonitor`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use super::executor::{ExecutionRequest, RebalanceExecutor};
use super::monitor::{TransactionMonitor, WatchedTransaction};
use crate::domain::allocation::Allocation;
use crate::domain::asset::AssetRegistry;
use crate::domain::estimate::{gas_cost, to_base_units};
use crate::domain::execution::{ExecutionMode, RebalanceResult};
use crate::domain::rebalance::NewRebalanceRecord;
use crate::error::{ExecutionError, LedgerError, Result};
use crate::port::outbound::directory::UserDirectory;
use crate::port::outbound::ledger::{LedgerClient, RebalanceCall};
use crate::port::outbound::metrics::{Counter, MetricsSink};
use crate::port::outbound::store::RecordStore;

/// Pricing inputs for live gas estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivePricing {
    /// USD per unit of native gas token.
    pub native_price_usd: Decimal,
    /// Used when the ledger cannot produce an estimate.
    pub fallback_gas_cost_usd: Decimal,
    pub confirmation_timeout: Duration,
}

pub struct LiveExecutor {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn UserDirectory>,
    assets: AssetRegistry,
    monitor: TransactionMonitor,
    pricing: LivePricing,
    metrics: Arc<dyn MetricsSink>,
}

impl LiveExecutor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn UserDirectory>,
        assets: AssetRegistry,
        monitor: TransactionMonitor,
        pricing: LivePricing,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            ledger,
            store,
            directory,
            assets,
            monitor,
            pricing,
            metrics,
        }
    }

    async fn build_call(&self, allocation: &Allocation) -> Result<RebalanceCall> {
        let wallet = self
            .directory
            .get_wallet_address(&allocation.user_id)
            .await?
            .ok_or_else(|| ExecutionError::MissingWallet {
                user_id: allocation.user_id.to_string(),
            })?;

        let resolved = self.assets.resolve(&allocation.asset_id);
        if resolved.is_native_fallback() {
            warn!(
                asset_id = %allocation.asset_id,
                allocation_id = %allocation.id,
                fallback = "native",
                address = %resolved.entry().address,
                "Unmapped asset id, using native asset address"
            );
        }
        let entry = resolved.entry();

        if to_base_units(allocation.amount, entry.decimals).is_none() {
            return Err(ExecutionError::InvalidAmount {
                asset_id: allocation.asset_id.clone(),
                reason: format!(
                    "{} does not fit in base units with {} decimals",
                    allocation.amount, entry.decimals
                ),
            }
            .into());
        }

        Ok(RebalanceCall {
            allocation_id: allocation.id.clone(),
            wallet,
            asset_address: entry.address.clone(),
            asset_decimals: entry.decimals,
            amount: allocation.amount,
        })
    }

    /// Ledger gas estimate in USD, or the nominal constant if it cannot be priced.
    async fn estimate_gas_usd(&self, call: &RebalanceCall) -> Decimal {
        match self.quote_gas(call).await {
            Ok(usd) => usd,
            Err(e) => {
                self.metrics.increment(Counter::GasEstimateFallbacks);
                warn!(
                    allocation_id = %call.allocation_id,
                    error = %e,
                    fallback_usd = %self.pricing.fallback_gas_cost_usd,
                    "Gas estimate failed, using nominal cost"
                );
                self.pricing.fallback_gas_cost_usd
            }
        }
    }

    async fn quote_gas(&self, call: &RebalanceCall) -> std::result::Result<Decimal, LedgerError> {
        let units = self.ledger.estimate_gas(call).await?;
        let fees = self.ledger.current_fee_data().await?;
        gas_cost(units, fees.gas_price_wei, self.pricing.native_price_usd)
            .map(|cost| cost.usd)
            .ok_or_else(|| {
                LedgerError::Rpc(format!(
                    "cannot price {units} gas units at native price ${}",
                    self.pricing.native_price_usd
                ))
            })
    }
}

#[async_trait]
impl RebalanceExecutor for LiveExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Live
    }

    async fn execute(&self, request: ExecutionRequest) -> Result<RebalanceResult> {
        let ExecutionRequest {
            allocation,
            sentiment,
            active_strategies,
            trigger,
            lease,
        } = request;

        let call = self.build_call(&allocation).await?;
        let gas_usd = self.estimate_gas_usd(&call).await;
        let attempt = NewRebalanceRecord::attempt(&allocation, &sentiment, trigger);

        let submitted = match self.ledger.submit(&call).await {
            Ok(submitted) => submitted,
            Err(e) => {
                self.metrics.increment(Counter::SubmissionFailures);
                let reason = e.to_string();
                let record = self.store.create(attempt.failed(reason.clone())).await?;
                error!(
                    mode = "live",
                    record_id = %record.id,
                    user_id = %allocation.user_id,
                    allocation_id = %allocation.id,
                    error = %reason,
                    "Rebalance submission failed"
                );
                return Err(ExecutionError::SubmissionFailed {
                    record_id: record.id,
                    reason,
                }
                .into());
            }
        };
        self.metrics.increment(Counter::LiveSubmissions);

        let record = match self
            .store
            .create(attempt.pending(submitted.tx_hash.clone(), gas_usd))
            .await
        {
            Ok(record) => record,
            Err(e) => {
                error!(
                    tx_hash = %submitted.tx_hash,
                    allocation_id = %allocation.id,
                    error = %e,
                    "Submitted transaction could not be recorded"
                );
                return Err(e);
            }
        };

        info!(
            mode = "live",
            record_id = %record.id,
            user_id = %allocation.user_id,
            allocation_id = %allocation.id,
            tx_hash = %submitted.tx_hash,
            gas_cost_usd = %gas_usd,
            "Rebalance submitted"
        );

        self.monitor.watch(WatchedTransaction {
            record_id: record.id.clone(),
            tx_hash: submitted.tx_hash.clone(),
            timeout: self.pricing.confirmation_timeout,
            lease: Some(lease),
        });

        Ok(RebalanceResult {
            executed: true,
            mode: ExecutionMode::Live,
            active_strategies,
            sentiment_score: sentiment.score,
            sentiment_label: sentiment.label,
            record_id: Some(record.id),
            tx_hash: Some(submitted.tx_hash),
            status: Some(record.status),
            estimated_gas_cost_usd: gas_usd,
            estimated_profit_usd: Decimal::ZERO,
        })
    }
}
