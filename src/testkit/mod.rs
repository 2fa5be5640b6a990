//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`ledger`] - Scripted [`LedgerClient`](crate::port::outbound::ledger::LedgerClient)
//!   with configurable authorization, gas, submission and receipt behaviour.
//! - [`store`] - In-memory [`RecordStore`](crate::port::outbound::store::RecordStore).
//! - [`sentiment`] - Provider that fails a scripted number of times.
//! - [`directory`] - Fixed user → wallet mapping.
//! - [`domain`] - Builders for allocations, layers and readings.

pub mod directory;
pub mod domain;
pub mod ledger;
pub mod sentiment;
pub mod store;
