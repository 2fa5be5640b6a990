//! Rebalance records: the durable outcome of one execution attempt.
//!
//! A record is created once by the execution path that owns it and moves
//! `pending -> success | failed` at most once. Paper executions are created
//! already terminal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::allocation::Allocation;
use super::error::DomainError;
use super::id::{AllocationId, RebalanceId, UserId};
use super::sentiment::{SentimentLabel, SentimentReading};

/// Prefix marking synthetic paper-trading transaction ids.
///
/// Real ledger hashes are `0x`-prefixed hex, so the two never collide.
pub const PAPER_TX_PREFIX: &str = "paper-";

/// Generate a unique synthetic transaction id for a paper execution.
#[must_use]
pub fn paper_tx_hash() -> String {
    format!("{PAPER_TX_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

/// Whether `tx_hash` is a synthetic paper id rather than a ledger reference.
#[must_use]
pub fn is_paper_tx(tx_hash: &str) -> bool {
    tx_hash.starts_with(PAPER_TX_PREFIX)
}

/// Lifecycle status of a rebalance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceStatus {
    Pending,
    Success,
    Failed,
}

impl RebalanceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `pending` may move, and only to a terminal status.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }
}

impl fmt::Display for RebalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RebalanceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            _ => Err(DomainError::UnknownValue {
                field: "rebalance status",
                value: s.to_string(),
            }),
        }
    }
}

/// What caused an execution attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    Manual,
    Scheduled,
    SentimentShift,
}

impl TriggerType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
            Self::SentimentShift => "sentiment_shift",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "manual" => Ok(Self::Manual),
            "scheduled" => Ok(Self::Scheduled),
            "sentiment_shift" => Ok(Self::SentimentShift),
            _ => Err(DomainError::UnknownValue {
                field: "trigger type",
                value: s.to_string(),
            }),
        }
    }
}

/// A persisted execution attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceRecord {
    pub id: RebalanceId,
    pub user_id: UserId,
    pub allocation_id: AllocationId,
    pub ecosystem: String,
    pub asset_id: String,
    pub trigger_type: TriggerType,
    pub sentiment_score: u8,
    pub sentiment_label: SentimentLabel,
    pub gas_cost_usd: Option<Decimal>,
    pub profit_usd: Option<Decimal>,
    pub tx_hash: Option<String>,
    pub status: RebalanceStatus,
    pub error_message: Option<String>,
    pub executed_at: DateTime<Utc>,
}

impl RebalanceRecord {
    /// Apply a terminal update in place.
    ///
    /// Fields left `None` in the update keep their current value.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] unless the record is
    /// pending and the update is terminal.
    pub fn apply(&mut self, update: &RebalanceUpdate) -> Result<(), DomainError> {
        if !self.status.can_transition_to(update.status) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: update.status,
            });
        }
        self.status = update.status;
        if update.gas_cost_usd.is_some() {
            self.gas_cost_usd = update.gas_cost_usd;
        }
        if update.profit_usd.is_some() {
            self.profit_usd = update.profit_usd;
        }
        if update.error_message.is_some() {
            self.error_message.clone_from(&update.error_message);
        }
        Ok(())
    }

    /// Whether the transaction reference is synthetic.
    #[must_use]
    pub fn is_paper(&self) -> bool {
        self.tx_hash.as_deref().is_some_and(is_paper_tx)
    }
}

/// A record about to be created. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRebalanceRecord {
    pub user_id: UserId,
    pub allocation_id: AllocationId,
    pub ecosystem: String,
    pub asset_id: String,
    pub trigger_type: TriggerType,
    pub sentiment_score: u8,
    pub sentiment_label: SentimentLabel,
    pub gas_cost_usd: Option<Decimal>,
    pub profit_usd: Option<Decimal>,
    pub tx_hash: Option<String>,
    pub status: RebalanceStatus,
    pub error_message: Option<String>,
    pub executed_at: DateTime<Utc>,
}

impl NewRebalanceRecord {
    /// Start a record for an attempt on `allocation`, stamped now.
    ///
    /// The status starts as `pending`; use the finishing builders to set it.
    #[must_use]
    pub fn attempt(
        allocation: &Allocation,
        sentiment: &SentimentReading,
        trigger_type: TriggerType,
    ) -> Self {
        Self {
            user_id: allocation.user_id.clone(),
            allocation_id: allocation.id.clone(),
            ecosystem: allocation.ecosystem.clone(),
            asset_id: allocation.asset_id.clone(),
            trigger_type,
            sentiment_score: sentiment.score,
            sentiment_label: sentiment.label,
            gas_cost_usd: None,
            profit_usd: None,
            tx_hash: None,
            status: RebalanceStatus::Pending,
            error_message: None,
            executed_at: Utc::now(),
        }
    }

    /// Submitted to the ledger, outcome unknown.
    #[must_use]
    pub fn pending(mut self, tx_hash: impl Into<String>, gas_cost_usd: Decimal) -> Self {
        self.status = RebalanceStatus::Pending;
        self.tx_hash = Some(tx_hash.into());
        self.gas_cost_usd = Some(gas_cost_usd);
        self
    }

    /// Completed immediately (paper trading).
    #[must_use]
    pub fn succeeded(mut self, tx_hash: impl Into<String>, gas_cost_usd: Decimal, profit_usd: Decimal) -> Self {
        self.status = RebalanceStatus::Success;
        self.tx_hash = Some(tx_hash.into());
        self.gas_cost_usd = Some(gas_cost_usd);
        self.profit_usd = Some(profit_usd);
        self
    }

    /// Failed before reaching the ledger.
    #[must_use]
    pub fn failed(mut self, error_message: impl Into<String>) -> Self {
        self.status = RebalanceStatus::Failed;
        self.error_message = Some(error_message.into());
        self
    }

    /// Materialize with the given id.
    #[must_use]
    pub fn into_record(self, id: RebalanceId) -> RebalanceRecord {
        RebalanceRecord {
            id,
            user_id: self.user_id,
            allocation_id: self.allocation_id,
            ecosystem: self.ecosystem,
            asset_id: self.asset_id,
            trigger_type: self.trigger_type,
            sentiment_score: self.sentiment_score,
            sentiment_label: self.sentiment_label,
            gas_cost_usd: self.gas_cost_usd,
            profit_usd: self.profit_usd,
            tx_hash: self.tx_hash,
            status: self.status,
            error_message: self.error_message,
            executed_at: self.executed_at,
        }
    }
}

/// Terminal update applied to a pending record.
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceUpdate {
    pub status: RebalanceStatus,
    pub gas_cost_usd: Option<Decimal>,
    pub profit_usd: Option<Decimal>,
    pub error_message: Option<String>,
}

impl RebalanceUpdate {
    #[must_use]
    pub fn success(gas_cost_usd: Option<Decimal>) -> Self {
        Self {
            status: RebalanceStatus::Success,
            gas_cost_usd,
            profit_usd: None,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            status: RebalanceStatus::Failed,
            gas_cost_usd: None,
            profit_usd: None,
            error_message: Some(error_message.into()),
        }
    }

    #[must_use]
    pub fn with_gas_cost(mut self, gas_cost_usd: Option<Decimal>) -> Self {
        self.gas_cost_usd = gas_cost_usd;
        self
    }
}
