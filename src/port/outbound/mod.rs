//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the engine's external collaborators: the
//! ledger, the record store, the user directory, the sentiment provider
//! and the metrics sink.

pub mod directory;
pub mod ledger;
pub mod metrics;
pub mod sentiment;
pub mod store;
