//! Rebalancer - sentiment-driven portfolio rebalancing.
//!
//! Evaluates a user's strategy stack against a market sentiment reading
//! and either simulates the rebalance (paper mode) or submits it through an
//! authorized keeper and tracks the transaction to a terminal outcome (live
//! mode).
//!
//! # Architecture
//!
//! - [`domain`] - Pure types and rules: allocations, sentiment, evaluation,
//!   records and their lifecycle
//! - [`port`] - Traits for the service entry points and external collaborators
//! - [`application`] - The rebalance pipeline, executors, monitor and retries
//! - [`adapter`] - CLI, SQLite, EVM ledger, HTTP sentiment and metrics
//! - [`infrastructure`] - Configuration and composition root
//!
//! # Features
//!
//! - `evm` (default) - alloy-based keeper vault client
//! - `testkit` - Scripted fakes for integration tests
//!
//! # Example
//!
//! ```no_run
//! use rebalancer::infrastructure::bootstrap::build_services;
//! use rebalancer::infrastructure::config::Config;
//! use rebalancer::port::inbound::rebalance::RebalanceService;
//!
//! # async fn example() -> rebalancer::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let services = build_services(&config, None).await?;
//! println!("mode: {}", services.engine.mode());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
