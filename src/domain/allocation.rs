//! User allocations and their strategy stacks.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{AllocationId, StrategyId, UserId};

/// Maximum layer weight (percent).
pub const MAX_WEIGHT: u8 = 100;

/// Sentiment predicate gating a strategy layer.
///
/// Values the engine does not recognize deserialize to [`Condition::Unknown`]
/// and never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[serde(alias = "Always")]
    Always,
    #[serde(alias = "Bullish")]
    Bullish,
    #[serde(alias = "Bearish")]
    Bearish,
    #[serde(alias = "Neutral")]
    Neutral,
    #[serde(alias = "Euphoric")]
    Euphoric,
    #[serde(alias = "HighVolatility")]
    HighVolatility,
    #[serde(alias = "AIAdaptive")]
    AiAdaptive,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Always => "always",
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
            Self::Euphoric => "euphoric",
            Self::HighVolatility => "high_volatility",
            Self::AiAdaptive => "ai_adaptive",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One condition -> strategy weighting in a user's stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyLayer {
    pub strategy_id: StrategyId,
    pub condition: Condition,
    /// Percentage weight, 0..=100.
    pub weight: u8,
}

impl StrategyLayer {
    pub fn new(strategy_id: impl Into<StrategyId>, condition: Condition, weight: u8) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            condition,
            weight,
        }
    }
}

/// A user's allocation of an asset to a strategy stack.
///
/// Created and updated by the CRUD layer; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: AllocationId,
    pub user_id: UserId,
    pub ecosystem: String,
    pub asset_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub layers: Vec<StrategyLayer>,
}

impl Allocation {
    /// Check amount and layer weights.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.amount <= Decimal::ZERO {
            return Err(DomainError::NonPositiveAmount {
                amount: self.amount,
            });
        }
        if let Some(layer) = self.layers.iter().find(|l| l.weight > MAX_WEIGHT) {
            return Err(DomainError::WeightOutOfRange {
                strategy_id: layer.strategy_id.to_string(),
                weight: u32::from(layer.weight),
            });
        }
        Ok(())
    }
}
