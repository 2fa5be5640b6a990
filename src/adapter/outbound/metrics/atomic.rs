//! In-memory counters.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::port::outbound::metrics::{Counter, MetricsSink};

/// Lock-free counter set, one slot per [`Counter`].
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    slots: [AtomicU64; Counter::ALL.len()],
}

impl AtomicMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        self.slots[Self::slot(counter)].load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: Counter::ALL
                .iter()
                .map(|&counter| (counter.name(), self.get(counter)))
                .collect(),
        }
    }

    fn slot(counter: Counter) -> usize {
        Counter::ALL
            .iter()
            .position(|&c| c == counter)
            .unwrap_or_default()
    }
}

impl MetricsSink for AtomicMetrics {
    fn increment(&self, counter: Counter) {
        self.slots[Self::slot(counter)].fetch_add(1, Ordering::Relaxed);
    }
}

/// Counter values keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<&'static str, u64>,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        self.counters.get(counter.name()).copied().unwrap_or(0)
    }
}
