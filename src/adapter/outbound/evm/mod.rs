//! EVM ledger adapter (alloy).

mod client;

pub use client::EvmLedgerClient;
