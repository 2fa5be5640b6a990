//! Sentiment provider port.

use async_trait::async_trait;

use crate::domain::sentiment::SentimentReading;
use crate::error::Result;

/// Source of market sentiment readings.
///
/// A single fetch may fail; callers wrap providers in the retrying
/// accessor rather than retrying themselves.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn fetch(&self) -> Result<SentimentReading>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
