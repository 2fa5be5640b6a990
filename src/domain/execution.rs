//! Execution mode and the results handed back to callers.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{RebalanceId, StrategyId};
use super::rebalance::RebalanceStatus;
use super::sentiment::{SentimentLabel, SentimentReading};

/// How rebalances are carried out. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Simulated outcomes, nothing touches the ledger.
    Paper,
    /// Transactions are signed by the keeper and submitted on-chain.
    Live,
}

impl ExecutionMode {
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of `execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceResult {
    /// Whether anything was executed or submitted.
    pub executed: bool,
    pub mode: ExecutionMode,
    pub active_strategies: Vec<StrategyId>,
    pub sentiment_score: u8,
    pub sentiment_label: SentimentLabel,
    pub record_id: Option<RebalanceId>,
    pub tx_hash: Option<String>,
    pub status: Option<RebalanceStatus>,
    pub estimated_gas_cost_usd: Decimal,
    /// Always zero for live submissions: profit is only known after confirmation.
    pub estimated_profit_usd: Decimal,
}

impl RebalanceResult {
    /// No strategy fired, nothing was executed or persisted.
    #[must_use]
    pub fn skipped(mode: ExecutionMode, sentiment: &SentimentReading) -> Self {
        Self {
            executed: false,
            mode,
            active_strategies: Vec::new(),
            sentiment_score: sentiment.score,
            sentiment_label: sentiment.label,
            record_id: None,
            tx_hash: None,
            status: None,
            estimated_gas_cost_usd: Decimal::ZERO,
            estimated_profit_usd: Decimal::ZERO,
        }
    }
}

/// Suggested action from a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Recommendation {
    Execute,
    Hold { reason: String },
}

/// Outcome of `simulate`. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub active_strategies: Vec<StrategyId>,
    pub estimated_gas_cost_usd: Decimal,
    pub estimated_profit_usd: Decimal,
    pub recommendation: Recommendation,
}

impl SimulationReport {
    /// Build a report, deriving the recommendation from the estimates.
    #[must_use]
    pub fn new(
        active_strategies: Vec<StrategyId>,
        estimated_gas_cost_usd: Decimal,
        estimated_profit_usd: Decimal,
    ) -> Self {
        let recommendation = if active_strategies.is_empty() {
            Recommendation::Hold {
                reason: "no strategy conditions met".to_string(),
            }
        } else if estimated_profit_usd > estimated_gas_cost_usd {
            Recommendation::Execute
        } else {
            Recommendation::Hold {
                reason: format!(
                    "estimated profit {estimated_profit_usd} does not cover gas {estimated_gas_cost_usd}"
                ),
            }
        };
        Self {
            active_strategies,
            estimated_gas_cost_usd,
            estimated_profit_usd,
            recommendation,
        }
    }
}
