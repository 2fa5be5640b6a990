//! Scripted sentiment provider.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::domain::sentiment::SentimentReading;
use crate::error::{Error, Result};
use crate::port::outbound::sentiment::SentimentProvider;

/// Fails the first `failures` calls, then returns `reading`.
///
/// Use `u32::MAX` failures for a provider that never answers.
pub struct ScriptedSentiment {
    failures: u32,
    reading: SentimentReading,
    calls: AtomicU32,
}

impl ScriptedSentiment {
    /// Always succeeds.
    pub fn returning(reading: SentimentReading) -> Self {
        Self::failing(0, reading)
    }

    /// Fails `failures` times before succeeding.
    pub fn failing(failures: u32, reading: SentimentReading) -> Self {
        Self {
            failures,
            reading,
            calls: AtomicU32::new(0),
        }
    }

    /// Never succeeds.
    pub fn unavailable() -> Self {
        Self::failing(u32::MAX, SentimentReading::neutral_fallback())
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentProvider for ScriptedSentiment {
    async fn fetch(&self) -> Result<SentimentReading> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(Error::Sentiment(format!("scripted failure {call}")));
        }
        Ok(self.reading.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
