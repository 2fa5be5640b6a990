//! Counters emitted as trace events.

use std::sync::Arc;

use tracing::debug;

use crate::port::outbound::metrics::{Counter, MetricsSink};

/// Emits one debug event per increment, for log-based aggregation, and
/// forwards the increment to an inner sink when one is set.
#[derive(Clone, Default)]
pub struct TracingMetrics {
    inner: Option<Arc<dyn MetricsSink>>,
}

impl TracingMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace every increment and also count it in `inner`.
    #[must_use]
    pub fn forwarding_to(inner: Arc<dyn MetricsSink>) -> Self {
        Self { inner: Some(inner) }
    }
}

impl MetricsSink for TracingMetrics {
    fn increment(&self, counter: Counter) {
        debug!(target: "rebalancer::metrics", counter = counter.name(), "counter incremented");
        if let Some(inner) = &self.inner {
            inner.increment(counter);
        }
    }
}
