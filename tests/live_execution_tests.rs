//! Live execution: submission, confirmation monitoring and failure isolation.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rebalancer::application::execution::monitor::{MONITOR_PANIC_MESSAGE, STORE_UPDATE_ATTEMPTS};
use rebalancer::domain::allocation::{Allocation, Condition};
use rebalancer::domain::asset::NATIVE_ASSET_ADDRESS;
use rebalancer::domain::execution::ExecutionMode;
use rebalancer::domain::rebalance::RebalanceStatus;
use rebalancer::error::{Error, ExecutionError};
use rebalancer::port::inbound::rebalance::{ExecuteRequest, RebalanceService};
use rebalancer::port::outbound::metrics::Counter;
use rebalancer::testkit::directory::StaticDirectory;
use rebalancer::testkit::domain::{allocation, allocation_with_id, layer, reading, USER};
use rebalancer::testkit::ledger::{ConfirmationScript, ScriptedLedger};

fn active_allocation() -> Allocation {
    allocation(dec!(1000), vec![layer("core", Condition::Always, 100)])
}

fn request() -> ExecuteRequest {
    ExecuteRequest::new(active_allocation()).with_sentiment(reading(70))
}

#[tokio::test]
async fn submission_returns_pending_and_monitor_confirms() {
    let ledger = Arc::new(ScriptedLedger::authorized());
    let h = support::live(ledger.clone()).await;
    assert_eq!(h.engine.mode(), ExecutionMode::Live);

    let result = h.engine.execute(request()).await.unwrap();

    assert!(result.executed);
    assert_eq!(result.mode, ExecutionMode::Live);
    assert_eq!(result.status, Some(RebalanceStatus::Pending));
    assert_eq!(result.estimated_profit_usd, Decimal::ZERO);
    // 100k gas at 20 gwei is 0.002 ETH, at $3000.
    assert_eq!(result.estimated_gas_cost_usd, dec!(6));

    let call = ledger.last_call().unwrap();
    assert_eq!(call.wallet, support::WALLET);
    assert_eq!(call.asset_address, NATIVE_ASSET_ADDRESS);
    assert_eq!(call.amount, dec!(1000));

    h.engine.drain_monitors().await;

    let records = h.store.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(Some(&record.id), result.record_id.as_ref());
    assert_eq!(record.status, RebalanceStatus::Success);
    assert_eq!(record.tx_hash, result.tx_hash);
    assert_eq!(record.gas_cost_usd, Some(dec!(6)));
    assert_eq!(h.metrics.get(Counter::LiveSubmissions), 1);
    assert_eq!(h.metrics.get(Counter::ConfirmationsSucceeded), 1);
    assert!(!h.engine.in_flight().is_in_flight(&record.allocation_id));
}

#[tokio::test]
async fn submission_failure_records_failed_attempt_without_monitor() {
    let ledger = Arc::new(ScriptedLedger::authorized().failing_submit("nonce too low"));
    let h = support::live(ledger.clone()).await;

    let err = h.engine.execute(request()).await.unwrap_err();

    let (record_id, reason) = match err {
        Error::Execution(ExecutionError::SubmissionFailed { record_id, reason }) => (record_id, reason),
        other => panic!("expected submission failure, got {other:?}"),
    };
    assert_eq!(reason, "nonce too low");

    let record = h.store.record(&record_id).unwrap();
    assert_eq!(record.status, RebalanceStatus::Failed);
    assert_eq!(record.error_message.as_deref(), Some("nonce too low"));
    assert!(record.tx_hash.is_none());

    assert_eq!(h.engine.monitors_in_flight(), 0);
    assert_eq!(ledger.confirmation_waits(), 0);
    assert_eq!(h.metrics.get(Counter::SubmissionFailures), 1);
    assert!(h.engine.in_flight().is_empty());
}

#[tokio::test]
async fn revert_fails_the_same_record() {
    let ledger = Arc::new(ScriptedLedger::authorized().reverting());
    let h = support::live(ledger).await;

    let result = h.engine.execute(request()).await.unwrap();
    h.engine.drain_monitors().await;

    let records = h.store.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(Some(&record.id), result.record_id.as_ref());
    assert_eq!(record.status, RebalanceStatus::Failed);
    let message = record.error_message.as_deref().unwrap();
    assert!(message.contains("reverted"), "unexpected error: {message}");
    assert_eq!(record.gas_cost_usd, Some(dec!(6)));
    assert_eq!(h.metrics.get(Counter::ConfirmationsFailed), 1);
}

#[tokio::test]
async fn client_error_while_waiting_fails_the_record() {
    let ledger = Arc::new(
        ScriptedLedger::authorized()
            .with_confirmation(ConfirmationScript::Error("receipt lookup failed".into())),
    );
    let h = support::live(ledger).await;

    h.engine.execute(request()).await.unwrap();
    h.engine.drain_monitors().await;

    let record = &h.store.records()[0];
    assert_eq!(record.status, RebalanceStatus::Failed);
    assert_eq!(record.error_message.as_deref(), Some("receipt lookup failed"));
}

#[tokio::test(start_paused = true)]
async fn confirmation_timeout_fails_the_record() {
    let ledger = Arc::new(ScriptedLedger::authorized().with_confirmation(ConfirmationScript::Never));
    let h = support::live(ledger).await;

    h.engine.execute(request()).await.unwrap();
    assert_eq!(h.engine.monitors_in_flight(), 1);

    h.engine.drain_monitors().await;

    let record = &h.store.records()[0];
    assert_eq!(record.status, RebalanceStatus::Failed);
    assert_eq!(record.error_message.as_deref(), Some("no confirmation within 60s"));
}

#[tokio::test]
async fn monitor_panic_is_isolated_and_fails_the_record() {
    let ledger = Arc::new(ScriptedLedger::authorized().with_confirmation(ConfirmationScript::Panic));
    let h = support::live(ledger).await;

    h.engine.execute(request()).await.unwrap();
    h.engine.drain_monitors().await;

    let record = &h.store.records()[0];
    assert_eq!(record.status, RebalanceStatus::Failed);
    assert_eq!(record.error_message.as_deref(), Some(MONITOR_PANIC_MESSAGE));
    assert!(h.engine.in_flight().is_empty());

    // The engine keeps working after a watcher panic.
    let next = h.engine.execute(request()).await.unwrap();
    assert!(next.executed);
}

#[tokio::test(start_paused = true)]
async fn allocation_cannot_have_two_live_executions_in_flight() {
    let ledger = Arc::new(
        ScriptedLedger::authorized().confirming_after(Duration::from_secs(30)),
    );
    let h = support::live(ledger.clone()).await;

    h.engine.execute(request()).await.unwrap();
    let second = h.engine.execute(request()).await;
    assert!(matches!(
        second,
        Err(Error::Execution(ExecutionError::AlreadyInFlight { .. }))
    ));

    let other = allocation_with_id("alloc-2", dec!(50), vec![layer("core", Condition::Always, 100)]);
    h.engine
        .execute(ExecuteRequest::new(other).with_sentiment(reading(70)))
        .await
        .unwrap();
    assert_eq!(ledger.submissions(), 2);

    h.engine.drain_monitors().await;
    assert!(h.engine.in_flight().is_empty());
    h.engine.execute(request()).await.unwrap();
    assert_eq!(ledger.submissions(), 3);
}

#[tokio::test]
async fn gas_estimate_failure_falls_back_to_nominal_cost() {
    let ledger = Arc::new(ScriptedLedger::authorized().failing_estimate("execution reverted"));
    let h = support::live(ledger).await;

    let result = h.engine.execute(request()).await.unwrap();

    assert_eq!(result.estimated_gas_cost_usd, dec!(3.5));
    assert_eq!(h.metrics.get(Counter::GasEstimateFallbacks), 1);
    h.engine.drain_monitors().await;
}

#[tokio::test]
async fn missing_wallet_fails_before_submission() {
    let ledger = Arc::new(ScriptedLedger::authorized());
    let h = support::live_with_directory(ledger.clone(), StaticDirectory::new()).await;

    let err = h.engine.execute(request()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Execution(ExecutionError::MissingWallet { .. })
    ));
    assert_eq!(ledger.submissions(), 0);
    assert!(h.store.records().is_empty());
    assert!(h.engine.in_flight().is_empty());
}

#[tokio::test]
async fn unauthorized_keeper_runs_in_paper_mode() {
    let ledger = Arc::new(ScriptedLedger::authorized().unauthorized());
    let h = support::live(ledger.clone()).await;

    assert_eq!(h.engine.mode(), ExecutionMode::Paper);
    let result = h.engine.execute(request()).await.unwrap();

    assert_eq!(result.mode, ExecutionMode::Paper);
    assert_eq!(result.status, Some(RebalanceStatus::Success));
    assert_eq!(ledger.submissions(), 0);
}

#[tokio::test]
async fn recovery_reattaches_pending_records_with_time_left() {
    let ledger = Arc::new(ScriptedLedger::authorized());
    let h = support::live(ledger.clone()).await;
    let alloc = active_allocation();
    let fresh = h.store.insert_pending(&alloc, "0xabc", Utc::now());
    let stale = h.store.insert_pending(
        &allocation_with_id("alloc-old", dec!(1), vec![]),
        "0xdef",
        Utc::now() - chrono::Duration::minutes(5),
    );

    let report = h.engine.recover_pending().await.unwrap();
    h.engine.drain_monitors().await;

    assert_eq!(report.reattached, 1);
    assert_eq!(report.expired, 1);
    assert_eq!(h.store.record(&fresh).unwrap().status, RebalanceStatus::Success);
    assert_eq!(h.store.record(&stale).unwrap().status, RebalanceStatus::Failed);
    assert_eq!(ledger.confirmation_waits(), 1);
}

#[tokio::test(start_paused = true)]
async fn monitor_retries_outcome_write_after_store_error() {
    let ledger = Arc::new(ScriptedLedger::authorized());
    let h = support::live(ledger).await;
    h.store.fail_next_updates(1);

    let result = h.engine.execute(request()).await.unwrap();
    h.engine.drain_monitors().await;

    let record = h.store.record(result.record_id.as_ref().unwrap()).unwrap();
    assert_eq!(record.status, RebalanceStatus::Success);
    assert_eq!(record.gas_cost_usd, Some(dec!(6)));
    assert_eq!(h.store.update_calls(), 2);
    assert_eq!(h.engine.monitors_in_flight(), 0);
    assert!(h.engine.in_flight().is_empty());
}

#[tokio::test(start_paused = true)]
async fn exhausted_outcome_writes_leave_record_for_recovery() {
    let ledger = Arc::new(ScriptedLedger::authorized());
    let h = support::live(ledger.clone()).await;
    h.store.fail_next_updates(STORE_UPDATE_ATTEMPTS as usize);

    let result = h.engine.execute(request()).await.unwrap();
    h.engine.drain_monitors().await;

    let id = result.record_id.unwrap();
    assert_eq!(h.store.update_calls(), STORE_UPDATE_ATTEMPTS as usize);
    assert_eq!(h.store.record(&id).unwrap().status, RebalanceStatus::Pending);
    // The lease is released once the monitor gives up, so recovery can take over.
    assert!(h.engine.in_flight().is_empty());

    let report = h.engine.recover_pending().await.unwrap();
    h.engine.drain_monitors().await;

    assert_eq!(report.reattached, 1);
    assert_eq!(h.store.record(&id).unwrap().status, RebalanceStatus::Success);
    assert_eq!(ledger.confirmation_waits(), 2);
}

#[tokio::test]
async fn unpriced_native_token_uses_nominal_gas_cost() {
    let ledger = Arc::new(ScriptedLedger::authorized());
    let h = support::live_priced(
        ledger,
        StaticDirectory::new().with_wallet(USER, support::WALLET),
        Decimal::ZERO,
    )
    .await;

    let result = h.engine.execute(request()).await.unwrap();
    assert_eq!(result.estimated_gas_cost_usd, dec!(3.5));
    assert_eq!(h.metrics.get(Counter::GasEstimateFallbacks), 1);

    h.engine.drain_monitors().await;

    let record = h.store.record(result.record_id.as_ref().unwrap()).unwrap();
    assert_eq!(record.status, RebalanceStatus::Success);
    assert_eq!(record.gas_cost_usd, Some(dec!(3.5)));
}
