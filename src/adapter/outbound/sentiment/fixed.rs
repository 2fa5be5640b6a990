//! Provider returning a caller-supplied reading.

use async_trait::async_trait;

use crate::domain::sentiment::SentimentReading;
use crate::error::Result;
use crate::port::outbound::sentiment::SentimentProvider;

#[derive(Debug, Clone)]
pub struct StaticSentimentProvider {
    reading: SentimentReading,
}

impl StaticSentimentProvider {
    #[must_use]
    pub fn new(reading: SentimentReading) -> Self {
        Self { reading }
    }
}

#[async_trait]
impl SentimentProvider for StaticSentimentProvider {
    async fn fetch(&self) -> Result<SentimentReading> {
        Ok(self.reading.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
