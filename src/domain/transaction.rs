//! Transient outcome of watching a submitted transaction.

use rust_decimal::Decimal;

use super::estimate::GasCost;
use super::rebalance::{RebalanceStatus, RebalanceUpdate};

/// What the monitor learned about a transaction. Folded into a record update.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
    pub tx_hash: String,
    pub status: RebalanceStatus,
    pub gas_used: Option<u64>,
    pub gas_cost_native: Option<Decimal>,
    pub gas_cost_usd: Option<Decimal>,
    pub error: Option<String>,
}

impl TransactionOutcome {
    #[must_use]
    pub fn confirmed(tx_hash: impl Into<String>, gas_used: u64, cost: Option<GasCost>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            status: RebalanceStatus::Success,
            gas_used: Some(gas_used),
            gas_cost_native: cost.map(|c| c.native),
            gas_cost_usd: cost.map(|c| c.usd),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(tx_hash: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            status: RebalanceStatus::Failed,
            gas_used: None,
            gas_cost_native: None,
            gas_cost_usd: None,
            error: Some(error.into()),
        }
    }

    /// Attach gas figures to a failed outcome (reverts still burn gas).
    #[must_use]
    pub fn with_gas(mut self, gas_used: u64, cost: Option<GasCost>) -> Self {
        self.gas_used = Some(gas_used);
        self.gas_cost_native = cost.map(|c| c.native);
        self.gas_cost_usd = cost.map(|c| c.usd);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RebalanceStatus::Success
    }

    /// The record update this outcome implies.
    #[must_use]
    pub fn to_update(&self) -> RebalanceUpdate {
        match self.status {
            RebalanceStatus::Success => RebalanceUpdate::success(self.gas_cost_usd),
            _ => RebalanceUpdate::failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "transaction failed".to_string()),
            )
            .with_gas_cost(self.gas_cost_usd),
        }
    }
}
