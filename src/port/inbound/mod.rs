//! Inbound ports (driving side): what callers may ask of the engine.

pub mod rebalance;
