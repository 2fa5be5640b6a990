//! The engine over an on-disk SQLite database.

mod support;

use std::sync::Arc;

use rust_decimal_macros::dec;

use rebalancer::adapter::outbound::metrics::AtomicMetrics;
use rebalancer::adapter::outbound::sqlite::database::connection::DbPool;
use rebalancer::adapter::outbound::sqlite::{SqliteRecordStore, SqliteUserDirectory};
use rebalancer::application::Rebalancer;
use rebalancer::domain::allocation::Condition;
use rebalancer::domain::id::UserId;
use rebalancer::domain::rebalance::RebalanceStatus;
use rebalancer::port::inbound::rebalance::{ExecuteRequest, RebalanceService};
use rebalancer::port::outbound::ledger::LedgerClient;
use rebalancer::port::outbound::store::RecordStore;
use rebalancer::testkit::domain::{allocation, layer, reading, USER};
use rebalancer::testkit::ledger::{ConfirmationScript, ScriptedLedger};

async fn engine(pool: &DbPool, ledger: Option<Arc<ScriptedLedger>>) -> Rebalancer {
    let ledger = ledger.map(|l| -> Arc<dyn LedgerClient> { l });
    Rebalancer::builder()
        .store(Arc::new(SqliteRecordStore::new(pool.clone())))
        .directory(Arc::new(SqliteUserDirectory::new(pool.clone())))
        .metrics(Arc::new(AtomicMetrics::new()))
        .ledger(ledger)
        .native_price_usd(dec!(3000))
        .confirmation_timeout(support::CONFIRMATION_TIMEOUT)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn paper_history_survives_reopen() {
    let (dir, pool) = support::temp_pool();
    let engine = engine(&pool, None).await;
    let alloc = allocation(dec!(1000), vec![layer("core", Condition::Always, 100)]);

    engine
        .execute(ExecuteRequest::new(alloc).with_sentiment(reading(70)))
        .await
        .unwrap();
    drop(engine);
    drop(pool);

    let reopened = rebalancer::adapter::outbound::sqlite::database::connection::open(
        dir.path().join("rebalancer.db").to_str().unwrap(),
    )
    .unwrap();
    let store = SqliteRecordStore::new(reopened);
    let history = store.find_by_user(&UserId::from(USER)).await.unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, RebalanceStatus::Success);
    assert_eq!(history[0].profit_usd, Some(dec!(7.0)));
}

#[tokio::test]
async fn live_confirmation_updates_the_stored_record() {
    let (_dir, pool) = support::temp_pool();
    SqliteUserDirectory::new(pool.clone())
        .link_wallet(&UserId::from(USER), support::WALLET)
        .unwrap();
    let engine = engine(&pool, Some(Arc::new(ScriptedLedger::authorized()))).await;
    let alloc = allocation(dec!(1000), vec![layer("core", Condition::Always, 100)]);

    let result = engine
        .execute(ExecuteRequest::new(alloc).with_sentiment(reading(70)))
        .await
        .unwrap();
    engine.drain_monitors().await;

    let store = SqliteRecordStore::new(pool);
    let record = store.get(&result.record_id.unwrap()).await.unwrap().unwrap();
    assert_eq!(record.status, RebalanceStatus::Success);
    assert_eq!(record.gas_cost_usd, Some(dec!(6)));
    assert!(store.find_pending().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn restart_recovers_records_left_pending() {
    let (_dir, pool) = support::temp_pool();
    SqliteUserDirectory::new(pool.clone())
        .link_wallet(&UserId::from(USER), support::WALLET)
        .unwrap();

    // First process submits and never sees a receipt.
    let hanging = Arc::new(ScriptedLedger::authorized().with_confirmation(ConfirmationScript::Never));
    let first = engine(&pool, Some(hanging)).await;
    let alloc = allocation(dec!(1000), vec![layer("core", Condition::Always, 100)]);
    let result = first
        .execute(ExecuteRequest::new(alloc).with_sentiment(reading(70)))
        .await
        .unwrap();
    drop(first);

    // Second process resumes and the receipt arrives.
    let second = engine(&pool, Some(Arc::new(ScriptedLedger::authorized()))).await;
    let report = second.recover_pending().await.unwrap();
    second.drain_monitors().await;

    assert_eq!(report.reattached, 1);
    let store = SqliteRecordStore::new(pool);
    let record = store.get(&result.record_id.unwrap()).await.unwrap().unwrap();
    assert_eq!(record.status, RebalanceStatus::Success);
}
