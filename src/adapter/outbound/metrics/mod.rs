//! Metrics sink adapters.

mod atomic;
mod traced;

pub use atomic::{AtomicMetrics, MetricsSnapshot};
pub use traced::TracingMetrics;
