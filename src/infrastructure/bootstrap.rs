//! Composition root.
//!
//! Turns a validated [`Config`] into a wired [`Rebalancer`] plus the
//! adapters the CLI needs direct access to.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::metrics::{AtomicMetrics, TracingMetrics};
use crate::adapter::outbound::sentiment::{HttpSentimentProvider, StaticSentimentProvider};
use crate::adapter::outbound::sqlite::database::connection::{open, DbPool};
use crate::adapter::outbound::sqlite::{SqliteRecordStore, SqliteUserDirectory};
use crate::application::Rebalancer;
use crate::domain::sentiment::SentimentReading;
use crate::error::Result;
use crate::infrastructure::config::ledger::LedgerConfig;
use crate::infrastructure::config::sentiment::SentimentConfig;
use crate::infrastructure::config::Config;
use crate::port::outbound::ledger::LedgerClient;
use crate::port::outbound::sentiment::SentimentProvider;

/// Everything a command handler needs.
pub struct Services {
    pub engine: Rebalancer,
    pub store: Arc<SqliteRecordStore>,
    pub directory: Arc<SqliteUserDirectory>,
    /// Counters for this process, also traced at debug level.
    pub metrics: Arc<AtomicMetrics>,
}

/// Open the configured database and apply migrations.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn open_database(config: &Config) -> Result<DbPool> {
    open(&config.database)
}

/// Wire adapters and build the engine.
///
/// `sentiment_override` pins the reading instead of querying the
/// configured endpoint.
///
/// # Errors
/// Returns an error if the database cannot be opened or the sentiment
/// endpoint is unusable.
pub async fn build_services(
    config: &Config,
    sentiment_override: Option<SentimentReading>,
) -> Result<Services> {
    let pool = open_database(config)?;
    let store = Arc::new(SqliteRecordStore::new(pool.clone()));
    let directory = Arc::new(SqliteUserDirectory::new(pool));
    let metrics = Arc::new(AtomicMetrics::new());

    let engine = Rebalancer::builder()
        .store(store.clone())
        .directory(directory.clone())
        .metrics(Arc::new(TracingMetrics::forwarding_to(metrics.clone())))
        .ledger(build_ledger(&config.ledger))
        .sentiment_provider(build_sentiment(&config.sentiment, sentiment_override)?)
        .retry_policy(config.sentiment.retry_policy())
        .assets(config.ledger.asset_registry())
        .paper_model(config.execution.paper_model())
        .native_price_usd(config.ledger.native_price_usd)
        .confirmation_timeout(config.ledger.confirmation_timeout())
        .build()
        .await?;

    Ok(Services {
        engine,
        store,
        directory,
        metrics,
    })
}

/// Sentiment source: a pinned reading, the HTTP endpoint, or nothing.
///
/// # Errors
/// Returns an error if the endpoint URL is malformed or the HTTP client
/// cannot be built.
pub fn build_sentiment(
    config: &SentimentConfig,
    sentiment_override: Option<SentimentReading>,
) -> Result<Option<Arc<dyn SentimentProvider>>> {
    if let Some(reading) = sentiment_override {
        return Ok(Some(Arc::new(StaticSentimentProvider::new(reading))));
    }
    let Some(endpoint) = config.endpoint() else {
        info!("No sentiment endpoint configured");
        return Ok(None);
    };
    let url = url::Url::parse(endpoint)?;
    let provider = HttpSentimentProvider::new(url, config.request_timeout())?;
    Ok(Some(Arc::new(provider)))
}

/// Ledger client, when a vault is configured and the build supports it.
///
/// A rejected keeper key leaves a read-only client so pending receipts can
/// still be observed; any other construction failure disables the ledger.
#[cfg(feature = "evm")]
#[must_use]
pub fn build_ledger(config: &LedgerConfig) -> Option<Arc<dyn LedgerClient>> {
    use crate::adapter::outbound::evm::EvmLedgerClient;
    use crate::error::LedgerError;

    if !config.is_enabled() {
        info!("No vault address configured, ledger disabled");
        return None;
    }
    let rpc_url = match url::Url::parse(&config.rpc_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Invalid RPC URL, ledger disabled");
            return None;
        }
    };

    let client = match EvmLedgerClient::new(
        rpc_url.clone(),
        config.chain_id,
        &config.vault_address,
        config.private_key.as_deref(),
    ) {
        Ok(client) => client,
        Err(LedgerError::Signer(reason)) => {
            warn!(error = %reason, "Keeper key rejected, ledger is read-only");
            match EvmLedgerClient::new(rpc_url, config.chain_id, &config.vault_address, None) {
                Ok(client) => client,
                Err(e) => {
                    warn!(error = %e, "Ledger client unavailable");
                    return None;
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "Ledger client unavailable");
            return None;
        }
    };

    info!(
        chain_id = config.chain_id,
        vault = %config.vault_address,
        signing = config.private_key.is_some(),
        "Ledger client configured"
    );
    Some(Arc::new(client))
}

#[cfg(not(feature = "evm"))]
#[must_use]
pub fn build_ledger(config: &LedgerConfig) -> Option<Arc<dyn LedgerClient>> {
    if config.is_enabled() {
        warn!("Built without the `evm` feature, ledger disabled");
    }
    None
}
