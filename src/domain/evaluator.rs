//! Strategy evaluation: which layers of a stack fire for a sentiment reading.
//!
//! Pure functions only. Every matching layer fires; the output keeps input
//! order and may contain the same strategy more than once.

use super::allocation::{Condition, StrategyLayer};
use super::id::StrategyId;
use super::sentiment::SentimentReading;

/// Score at or above which the market is considered bullish.
pub const BULLISH_MIN_SCORE: u8 = 60;
/// Score at or below which the market is considered bearish.
pub const BEARISH_MAX_SCORE: u8 = 40;
/// Score at or above which the market is considered euphoric.
pub const EUPHORIC_MIN_SCORE: u8 = 80;
/// Score at or below which the lower volatility band starts.
pub const VOLATILITY_LOW_MAX_SCORE: u8 = 20;
/// Confidence strictly above which adaptive strategies engage.
pub const AI_ADAPTIVE_MIN_CONFIDENCE: f64 = 0.8;

impl Condition {
    /// Whether this condition holds for the given reading.
    ///
    /// `HighVolatility` overlaps `Euphoric` above 80 and `Bearish` below 20.
    #[must_use]
    pub fn matches(self, sentiment: &SentimentReading) -> bool {
        let score = sentiment.score;
        match self {
            Self::Always => true,
            Self::Bullish => score >= BULLISH_MIN_SCORE,
            Self::Bearish => score <= BEARISH_MAX_SCORE,
            Self::Neutral => score > BEARISH_MAX_SCORE && score < BULLISH_MIN_SCORE,
            Self::Euphoric => score >= EUPHORIC_MIN_SCORE,
            Self::HighVolatility => {
                score >= EUPHORIC_MIN_SCORE || score <= VOLATILITY_LOW_MAX_SCORE
            }
            Self::AiAdaptive => sentiment.confidence() > AI_ADAPTIVE_MIN_CONFIDENCE,
            Self::Unknown => false,
        }
    }
}

/// Return the strategies whose layer condition holds, in input order.
///
/// An empty result means there is nothing to execute.
#[must_use]
pub fn evaluate(layers: &[StrategyLayer], sentiment: &SentimentReading) -> Vec<StrategyId> {
    layers
        .iter()
        .filter(|layer| layer.condition.matches(sentiment))
        .map(|layer| layer.strategy_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentiment::SentimentLabel;

    fn reading(score: u8) -> SentimentReading {
        SentimentReading::try_new(score, SentimentLabel::from_score(score)).unwrap()
    }

    fn layer(id: &str, condition: Condition) -> StrategyLayer {
        StrategyLayer::new(id, condition, 50)
    }

    #[test]
    fn bullish_boundary_is_inclusive_at_sixty() {
        assert!(Condition::Bullish.matches(&reading(60)));
        assert!(!Condition::Bullish.matches(&reading(59)));
    }

    #[test]
    fn bearish_boundary_is_inclusive_at_forty() {
        assert!(Condition::Bearish.matches(&reading(40)));
        assert!(!Condition::Bearish.matches(&reading(41)));
    }

    #[test]
    fn neutral_excludes_both_band_edges() {
        assert!(!Condition::Neutral.matches(&reading(40)));
        assert!(Condition::Neutral.matches(&reading(41)));
        assert!(Condition::Neutral.matches(&reading(59)));
        assert!(!Condition::Neutral.matches(&reading(60)));
    }

    #[test]
    fn bullish_bearish_neutral_partition_every_score() {
        for score in 0..=100u8 {
            let r = reading(score);
            let hits = [Condition::Bullish, Condition::Bearish, Condition::Neutral]
                .into_iter()
                .filter(|c| c.matches(&r))
                .count();
            assert_eq!(hits, 1, "score {score} matched {hits} bands");
        }
    }

    #[test]
    fn high_volatility_overlaps_extremes() {
        // HighVolatility deliberately overlaps the euphoric and deep bearish bands.
        for score in [0u8, 20, 80, 100] {
            assert!(Condition::HighVolatility.matches(&reading(score)));
        }
        assert!(Condition::Euphoric.matches(&reading(80)));
        assert!(Condition::Bearish.matches(&reading(20)));
        assert!(!Condition::HighVolatility.matches(&reading(21)));
        assert!(!Condition::HighVolatility.matches(&reading(79)));
    }

    #[test]
    fn ai_adaptive_needs_confidence_strictly_above_threshold() {
        assert!(!Condition::AiAdaptive.matches(&reading(50)));
        assert!(!Condition::AiAdaptive.matches(&reading(50).with_confidence(0.8)));
        assert!(Condition::AiAdaptive.matches(&reading(50).with_confidence(0.81)));
    }

    #[test]
    fn unknown_condition_never_fires() {
        for score in [0u8, 50, 100] {
            assert!(!Condition::Unknown.matches(&reading(score)));
        }
    }

    #[test]
    fn always_layer_yields_exactly_one_strategy() {
        let layers = vec![layer("core", Condition::Always)];
        for score in [0u8, 37, 50, 99] {
            assert_eq!(evaluate(&layers, &reading(score)).len(), 1);
        }
    }

    #[test]
    fn output_preserves_order_and_duplicates() {
        let layers = vec![
            layer("momentum", Condition::Bullish),
            layer("hedge", Condition::Bearish),
            layer("core", Condition::Always),
            layer("momentum", Condition::Euphoric),
        ];
        let active = evaluate(&layers, &reading(85));
        let ids: Vec<_> = active.iter().map(StrategyId::as_str).collect();
        assert_eq!(ids, vec!["momentum", "core", "momentum"]);
    }

    #[test]
    fn empty_stack_yields_nothing() {
        assert!(evaluate(&[], &reading(50)).is_empty());
    }
}
