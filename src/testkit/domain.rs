//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for allocations, strategy layers and
//! sentiment readings so tests focus on assertions rather than
//! construction boilerplate.

use rust_decimal::Decimal;

use crate::domain::allocation::{Allocation, Condition, StrategyLayer};
use crate::domain::id::{AllocationId, UserId};
use crate::domain::sentiment::{SentimentLabel, SentimentReading};

/// Default user id used by [`allocation`].
pub const USER: &str = "user-1";

/// Default allocation id used by [`allocation`].
pub const ALLOCATION: &str = "alloc-1";

/// Allocation `alloc-1` of `user-1` holding `eth` in the `defi` ecosystem.
pub fn allocation(amount: Decimal, layers: Vec<StrategyLayer>) -> Allocation {
    allocation_with_id(ALLOCATION, amount, layers)
}

/// Same as [`allocation`] with a custom allocation id.
pub fn allocation_with_id(id: &str, amount: Decimal, layers: Vec<StrategyLayer>) -> Allocation {
    Allocation {
        id: AllocationId::from(id),
        user_id: UserId::from(USER),
        ecosystem: "defi".to_string(),
        asset_id: "eth".to_string(),
        amount,
        layers,
    }
}

/// Create a [`StrategyLayer`].
pub fn layer(strategy_id: &str, condition: Condition, weight: u8) -> StrategyLayer {
    StrategyLayer::new(strategy_id, condition, weight)
}

/// Reading with the label derived from the score and no confidence.
pub fn reading(score: u8) -> SentimentReading {
    SentimentReading::try_new(score, SentimentLabel::from_score(score))
        .expect("test sentiment score should be within range")
}

/// Reading with an explicit label and confidence.
pub fn labelled(score: u8, label: SentimentLabel, confidence: f64) -> SentimentReading {
    SentimentReading {
        score,
        label,
        confidence: Some(confidence),
        summary: String::new(),
        trending_topics: Vec::new(),
    }
}
