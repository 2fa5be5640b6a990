//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new`/`validate` methods when an input
//! violates a domain invariant, and by [`RebalanceRecord::apply`] when a
//! status change would regress a terminal record.
//!
//! [`RebalanceRecord::apply`]: crate::domain::rebalance::RebalanceRecord::apply

use rust_decimal::Decimal;
use thiserror::Error;

use super::rebalance::RebalanceStatus;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Sentiment scores are normalized to 0..=100.
    #[error("sentiment score must be within 0..=100, got {score}")]
    ScoreOutOfRange {
        /// The invalid score.
        score: u32,
    },

    /// Confidence is a probability.
    #[error("confidence must be within 0..=1, got {confidence}")]
    ConfidenceOutOfRange {
        /// The invalid confidence.
        confidence: f64,
    },

    /// Layer weights are percentages.
    #[error("weight for strategy '{strategy_id}' must be within 0..=100, got {weight}")]
    WeightOutOfRange {
        /// Strategy the layer refers to.
        strategy_id: String,
        /// The invalid weight.
        weight: u32,
    },

    /// Allocations must carry a positive amount.
    #[error("allocation amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The invalid amount.
        amount: Decimal,
    },

    /// A record may only move from `pending` to a terminal status.
    #[error("invalid rebalance status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: RebalanceStatus,
        /// Requested status.
        to: RebalanceStatus,
    },

    /// Unrecognized textual value for an enumerated field.
    #[error("unknown {field} '{value}'")]
    UnknownValue {
        /// Field being parsed.
        field: &'static str,
        /// The value that did not match.
        value: String,
    },
}
