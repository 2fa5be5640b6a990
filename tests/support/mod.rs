#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rebalancer::adapter::outbound::metrics::AtomicMetrics;
use rebalancer::adapter::outbound::sqlite::database::connection::{open, DbPool};
use rebalancer::application::Rebalancer;
use rebalancer::domain::asset::AssetRegistry;
use rebalancer::port::outbound::ledger::LedgerClient;
use rebalancer::port::outbound::sentiment::SentimentProvider;
use rebalancer::testkit::directory::StaticDirectory;
use rebalancer::testkit::domain::USER;
use rebalancer::testkit::ledger::ScriptedLedger;
use rebalancer::testkit::store::InMemoryRecordStore;

/// Wallet linked to the default test user.
pub const WALLET: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// Confirmation timeout used by live engines in tests.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

pub struct Harness {
    pub engine: Rebalancer,
    pub store: Arc<InMemoryRecordStore>,
    pub metrics: Arc<AtomicMetrics>,
}

pub async fn paper() -> Harness {
    paper_with_sentiment(None).await
}

pub async fn paper_with_sentiment(provider: Option<Arc<dyn SentimentProvider>>) -> Harness {
    let store = Arc::new(InMemoryRecordStore::new());
    let metrics = Arc::new(AtomicMetrics::new());
    let engine = Rebalancer::builder()
        .store(store.clone())
        .directory(Arc::new(StaticDirectory::new()))
        .metrics(metrics.clone())
        .sentiment_provider(provider)
        .build()
        .await
        .expect("paper engine should build");
    Harness {
        engine,
        store,
        metrics,
    }
}

/// Live engine over `ledger`, ETH priced at $3000, with the test user's wallet linked.
pub async fn live(ledger: Arc<ScriptedLedger>) -> Harness {
    live_with_directory(ledger, StaticDirectory::new().with_wallet(USER, WALLET)).await
}

pub async fn live_with_directory(ledger: Arc<ScriptedLedger>, directory: StaticDirectory) -> Harness {
    live_priced(ledger, directory, dec!(3000)).await
}

/// Live engine with an explicit native token price; zero means unpriced.
pub async fn live_priced(
    ledger: Arc<ScriptedLedger>,
    directory: StaticDirectory,
    native_price_usd: Decimal,
) -> Harness {
    let store = Arc::new(InMemoryRecordStore::new());
    let metrics = Arc::new(AtomicMetrics::new());
    let client: Arc<dyn LedgerClient> = ledger;
    let engine = Rebalancer::builder()
        .store(store.clone())
        .directory(Arc::new(directory))
        .metrics(metrics.clone())
        .ledger(Some(client))
        .assets(AssetRegistry::default())
        .native_price_usd(native_price_usd)
        .confirmation_timeout(CONFIRMATION_TIMEOUT)
        .build()
        .await
        .expect("live engine should build");
    Harness {
        engine,
        store,
        metrics,
    }
}

/// On-disk SQLite database with migrations applied.
pub fn temp_pool() -> (tempfile::TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("rebalancer.db");
    let pool = open(path.to_str().expect("utf-8 temp path")).expect("open sqlite database");
    (dir, pool)
}
