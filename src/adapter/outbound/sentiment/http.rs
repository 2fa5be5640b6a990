//! HTTP sentiment provider.
//!
//! Fetches a JSON reading from a single GET endpoint. One call per
//! [`fetch`](SentimentProvider::fetch); retries are the caller's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::domain::error::DomainError;
use crate::domain::sentiment::{SentimentLabel, SentimentReading};
use crate::error::{Error, Result};
use crate::port::outbound::sentiment::SentimentProvider;

#[derive(Debug, Clone)]
pub struct HttpSentimentProvider {
    client: Client,
    url: Url,
}

impl HttpSentimentProvider {
    /// Create a provider for `url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: Url, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self { client, url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Wire shape of a provider response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentResponse {
    score: u32,
    label: SentimentLabel,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    trending_topics: Vec<String>,
}

impl TryFrom<SentimentResponse> for SentimentReading {
    type Error = DomainError;

    fn try_from(response: SentimentResponse) -> std::result::Result<Self, Self::Error> {
        let score = u8::try_from(response.score).map_err(|_| DomainError::ScoreOutOfRange {
            score: response.score,
        })?;
        let reading = Self {
            score,
            label: response.label,
            confidence: response.confidence,
            summary: response.summary,
            trending_topics: response.trending_topics,
        };
        reading.validate()?;
        Ok(reading)
    }
}

#[async_trait]
impl SentimentProvider for HttpSentimentProvider {
    async fn fetch(&self) -> Result<SentimentReading> {
        let response = self
            .client
            .get(self.url.clone())
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Sentiment(e.to_string()))?
            .json::<SentimentResponse>()
            .await?;

        Ok(SentimentReading::try_from(response)?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
