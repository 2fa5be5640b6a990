//! Paper-mode execution and previews.

mod support;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rebalancer::domain::allocation::Condition;
use rebalancer::domain::execution::{ExecutionMode, Recommendation};
use rebalancer::domain::id::UserId;
use rebalancer::domain::rebalance::{is_paper_tx, RebalanceStatus, TriggerType};
use rebalancer::port::inbound::rebalance::{ExecuteRequest, RebalanceService};
use rebalancer::port::outbound::metrics::Counter;
use rebalancer::testkit::domain::{allocation, layer, reading, USER};

fn two_layer_allocation() -> rebalancer::domain::allocation::Allocation {
    allocation(
        dec!(1000),
        vec![
            layer("core", Condition::Always, 50),
            layer("momentum", Condition::Bullish, 50),
        ],
    )
}

#[tokio::test]
async fn paper_execution_records_success_with_bonus_profit() {
    let h = support::paper().await;
    assert_eq!(h.engine.mode(), ExecutionMode::Paper);

    let result = h
        .engine
        .execute(
            ExecuteRequest::new(two_layer_allocation())
                .with_sentiment(reading(70))
                .with_trigger(TriggerType::Scheduled),
        )
        .await
        .unwrap();

    assert!(result.executed);
    assert_eq!(result.mode, ExecutionMode::Paper);
    assert_eq!(result.estimated_profit_usd, dec!(12.0));
    assert_eq!(result.estimated_gas_cost_usd, dec!(3.5));
    assert_eq!(result.status, Some(RebalanceStatus::Success));

    let records = h.store.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.status, RebalanceStatus::Success);
    assert_eq!(record.trigger_type, TriggerType::Scheduled);
    assert_eq!(record.profit_usd, Some(dec!(12.0)));
    assert_eq!(record.gas_cost_usd, Some(dec!(3.5)));
    assert_eq!(record.sentiment_score, 70);
    assert!(is_paper_tx(record.tx_hash.as_deref().unwrap()));
    assert_eq!(Some(&record.id), result.record_id.as_ref());

    assert_eq!(h.metrics.get(Counter::PaperExecutions), 1);
    assert_eq!(h.metrics.get(Counter::ExecutionsRequested), 1);
}

#[tokio::test]
async fn bonus_requires_score_strictly_above_threshold() {
    let h = support::paper().await;

    let result = h
        .engine
        .execute(ExecuteRequest::new(two_layer_allocation()).with_sentiment(reading(60)))
        .await
        .unwrap();

    assert_eq!(result.estimated_profit_usd, dec!(10.0));
}

#[tokio::test]
async fn paper_ids_are_unique_per_execution() {
    let h = support::paper().await;

    for _ in 0..3 {
        h.engine
            .execute(ExecuteRequest::new(two_layer_allocation()).with_sentiment(reading(70)))
            .await
            .unwrap();
    }

    let mut hashes: Vec<_> = h
        .store
        .records()
        .into_iter()
        .filter_map(|r| r.tx_hash)
        .collect();
    hashes.sort();
    hashes.dedup();
    assert_eq!(hashes.len(), 3);
}

#[tokio::test]
async fn no_active_strategies_persists_nothing() {
    let h = support::paper().await;
    let alloc = allocation(dec!(500), vec![layer("bear", Condition::Bearish, 100)]);

    let result = h
        .engine
        .execute(ExecuteRequest::new(alloc).with_sentiment(reading(75)))
        .await
        .unwrap();

    assert!(!result.executed);
    assert!(result.active_strategies.is_empty());
    assert_eq!(result.estimated_profit_usd, Decimal::ZERO);
    assert!(h.store.records().is_empty());
}

#[tokio::test]
async fn simulate_is_idempotent_and_never_persists() {
    let h = support::paper().await;
    let alloc = two_layer_allocation();

    let first = h.engine.simulate(&alloc, &reading(70)).await.unwrap();
    let second = h.engine.simulate(&alloc, &reading(70)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.recommendation, Recommendation::Execute);
    assert_eq!(first.estimated_profit_usd, dec!(12.0));
    assert!(h.store.records().is_empty());
    assert_eq!(h.metrics.get(Counter::ExecutionsRequested), 0);
}

#[tokio::test]
async fn simulate_holds_when_profit_does_not_cover_gas() {
    let h = support::paper().await;
    let alloc = allocation(dec!(100), vec![layer("core", Condition::Always, 100)]);

    let report = h.engine.simulate(&alloc, &reading(50)).await.unwrap();

    assert_eq!(report.estimated_profit_usd, dec!(0.5));
    assert!(matches!(report.recommendation, Recommendation::Hold { .. }));
}

#[tokio::test]
async fn invalid_allocation_is_rejected_before_anything_runs() {
    let h = support::paper().await;
    let alloc = allocation(dec!(-5), vec![layer("core", Condition::Always, 100)]);

    assert!(h
        .engine
        .execute(ExecuteRequest::new(alloc).with_sentiment(reading(70)))
        .await
        .is_err());
    assert!(h.store.records().is_empty());
}

#[tokio::test]
async fn history_returns_newest_first() {
    let h = support::paper().await;
    for score in [61, 62, 63] {
        h.engine
            .execute(ExecuteRequest::new(two_layer_allocation()).with_sentiment(reading(score)))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let history = h.engine.history(&UserId::from(USER)).await.unwrap();
    let scores: Vec<u8> = history.iter().map(|r| r.sentiment_score).collect();
    assert_eq!(scores, vec![63, 62, 61]);
}
