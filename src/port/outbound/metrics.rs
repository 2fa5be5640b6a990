//! Metrics sink port.

use std::fmt;

/// Counters emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    ExecutionsRequested,
    PaperExecutions,
    LiveSubmissions,
    SubmissionFailures,
    ConfirmationsSucceeded,
    ConfirmationsFailed,
    GasEstimateFallbacks,
    SentimentFallbacks,
}

impl Counter {
    pub const ALL: [Self; 8] = [
        Self::ExecutionsRequested,
        Self::PaperExecutions,
        Self::LiveSubmissions,
        Self::SubmissionFailures,
        Self::ConfirmationsSucceeded,
        Self::ConfirmationsFailed,
        Self::GasEstimateFallbacks,
        Self::SentimentFallbacks,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ExecutionsRequested => "executions_requested",
            Self::PaperExecutions => "paper_executions",
            Self::LiveSubmissions => "live_submissions",
            Self::SubmissionFailures => "submission_failures",
            Self::ConfirmationsSucceeded => "confirmations_succeeded",
            Self::ConfirmationsFailed => "confirmations_failed",
            Self::GasEstimateFallbacks => "gas_estimate_fallbacks",
            Self::SentimentFallbacks => "sentiment_fallbacks",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Injected sink for process counters. Must not block.
pub trait MetricsSink: Send + Sync {
    fn increment(&self, counter: Counter);
}
