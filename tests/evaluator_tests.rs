//! Strategy evaluation across the sentiment range.

use rebalancer::domain::allocation::Condition;
use rebalancer::domain::evaluator::evaluate;
use rebalancer::domain::id::StrategyId;
use rebalancer::domain::sentiment::SentimentLabel;
use rebalancer::testkit::domain::{labelled, layer, reading};

fn ids(names: &[&str]) -> Vec<StrategyId> {
    names.iter().map(|n| StrategyId::from(*n)).collect()
}

#[test]
fn bullish_and_always_fire_at_seventy() {
    let layers = vec![
        layer("core", Condition::Always, 40),
        layer("momentum", Condition::Bullish, 30),
        layer("defensive", Condition::Bearish, 30),
    ];

    assert_eq!(evaluate(&layers, &reading(70)), ids(&["core", "momentum"]));
}

#[test]
fn neutral_band_is_exclusive_on_both_ends() {
    let layers = vec![layer("flat", Condition::Neutral, 100)];

    assert!(evaluate(&layers, &reading(40)).is_empty());
    assert_eq!(evaluate(&layers, &reading(41)), ids(&["flat"]));
    assert_eq!(evaluate(&layers, &reading(59)), ids(&["flat"]));
    assert!(evaluate(&layers, &reading(60)).is_empty());
}

#[test]
fn high_volatility_overlaps_euphoric_and_deep_bearish() {
    let layers = vec![
        layer("vol", Condition::HighVolatility, 50),
        layer("euphoria", Condition::Euphoric, 25),
        layer("bear", Condition::Bearish, 25),
    ];

    assert_eq!(evaluate(&layers, &reading(85)), ids(&["vol", "euphoria"]));
    assert_eq!(evaluate(&layers, &reading(15)), ids(&["vol", "bear"]));
    assert_eq!(evaluate(&layers, &reading(30)), ids(&["bear"]));
}

#[test]
fn ai_adaptive_needs_confidence_strictly_above_point_eight() {
    let layers = vec![layer("ai", Condition::AiAdaptive, 100)];

    assert!(evaluate(&layers, &labelled(50, SentimentLabel::Neutral, 0.8)).is_empty());
    assert_eq!(
        evaluate(&layers, &labelled(50, SentimentLabel::Neutral, 0.81)),
        ids(&["ai"])
    );
    // No reported confidence defaults to 0.5.
    assert!(evaluate(&layers, &reading(50)).is_empty());
}

#[test]
fn unknown_condition_never_fires() {
    let layers = vec![layer("odd", Condition::Unknown, 100)];
    for score in [0, 20, 50, 80, 100] {
        assert!(evaluate(&layers, &reading(score)).is_empty());
    }
}

#[test]
fn duplicate_strategies_are_kept_in_order() {
    let layers = vec![
        layer("s1", Condition::Always, 10),
        layer("s2", Condition::Bullish, 10),
        layer("s1", Condition::Bullish, 10),
    ];

    assert_eq!(evaluate(&layers, &reading(65)), ids(&["s1", "s2", "s1"]));
}
