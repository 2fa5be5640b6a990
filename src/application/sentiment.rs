//! Sentiment access with bounded retries.
//!
//! The execution pipeline always needs a reading to evaluate against, so
//! provider failures are absorbed here and end in the neutral fallback.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::sentiment::SentimentReading;
use crate::port::outbound::metrics::{Counter, MetricsSink};
use crate::port::outbound::sentiment::SentimentProvider;

/// Exponential backoff policy for sentiment fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Wait after the first failure; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following failed attempt `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Retrying wrapper around an optional sentiment provider.
#[derive(Clone)]
pub struct RetryingSentiment {
    provider: Option<Arc<dyn SentimentProvider>>,
    policy: RetryPolicy,
    metrics: Arc<dyn MetricsSink>,
}

impl RetryingSentiment {
    pub fn new(
        provider: Option<Arc<dyn SentimentProvider>>,
        policy: RetryPolicy,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            provider,
            policy,
            metrics,
        }
    }

    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch a reading, falling back to neutral once attempts run out.
    ///
    /// Waits only between attempts: three attempts with a one second base
    /// delay sleep 1s then 2s before giving up.
    pub async fn get(&self) -> SentimentReading {
        let Some(provider) = &self.provider else {
            warn!("No sentiment provider configured, using neutral fallback");
            self.metrics.increment(Counter::SentimentFallbacks);
            return SentimentReading::neutral_fallback();
        };

        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            let error = match provider.fetch().await {
                Ok(reading) => match reading.validate() {
                    Ok(()) => {
                        debug!(
                            provider = provider.name(),
                            attempt,
                            score = reading.score,
                            label = %reading.label,
                            "Sentiment fetched"
                        );
                        return reading;
                    }
                    Err(e) => e.to_string(),
                },
                Err(e) => e.to_string(),
            };

            warn!(
                provider = provider.name(),
                attempt,
                max_attempts = attempts,
                error = %error,
                "Sentiment fetch failed"
            );

            if attempt < attempts {
                tokio::time::sleep(self.policy.delay_after(attempt)).await;
            }
        }

        warn!(
            provider = provider.name(),
            "Sentiment attempts exhausted, using neutral fallback"
        );
        self.metrics.increment(Counter::SentimentFallbacks);
        SentimentReading::neutral_fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn delay_for_attempt_zero_is_base() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        };
        assert_eq!(policy.delay_after(0), Duration::from_millis(250));
    }
}
