//! Outbound adapters (driven side).

#[cfg(feature = "evm")]
pub mod evm;
pub mod metrics;
pub mod sentiment;
pub mod sqlite;
