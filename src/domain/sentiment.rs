//! Market sentiment snapshot consumed by the strategy evaluator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Confidence assumed when a provider does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Highest valid sentiment score.
pub const MAX_SCORE: u8 = 100;

/// Categorical sentiment label reported alongside the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    #[serde(alias = "Bearish")]
    Bearish,
    #[serde(alias = "Neutral")]
    Neutral,
    #[serde(alias = "Bullish")]
    Bullish,
    #[serde(alias = "Euphoric")]
    Euphoric,
}

impl SentimentLabel {
    /// Stable lowercase name, used for persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
            Self::Bullish => "bullish",
            Self::Euphoric => "euphoric",
        }
    }

    /// Derive a label from a bare score, for callers that only know the number.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Euphoric
        } else if score >= 60 {
            Self::Bullish
        } else if score <= 40 {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearish" => Ok(Self::Bearish),
            "neutral" => Ok(Self::Neutral),
            "bullish" => Ok(Self::Bullish),
            "euphoric" => Ok(Self::Euphoric),
            _ => Err(DomainError::UnknownValue {
                field: "sentiment label",
                value: s.to_string(),
            }),
        }
    }
}

/// Immutable sentiment snapshot produced by an external provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReading {
    /// Normalized score, 0 (max fear) to 100 (max greed).
    pub score: u8,
    pub label: SentimentLabel,
    /// Provider confidence in 0..=1, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub trending_topics: Vec<String>,
}

impl SentimentReading {
    /// Create a validated reading with no confidence, summary or topics.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ScoreOutOfRange`] when `score > 100`.
    pub fn try_new(score: u8, label: SentimentLabel) -> Result<Self, DomainError> {
        let reading = Self {
            score,
            label,
            confidence: None,
            summary: String::new(),
            trending_topics: Vec::new(),
        };
        reading.validate()?;
        Ok(reading)
    }

    /// Attach a provider confidence.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach a human-readable summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Neutral reading used when no provider answer could be obtained.
    #[must_use]
    pub fn neutral_fallback() -> Self {
        Self {
            score: 50,
            label: SentimentLabel::Neutral,
            confidence: Some(0.0),
            summary: "Sentiment unavailable, using neutral fallback".to_string(),
            trending_topics: Vec::new(),
        }
    }

    /// Confidence with the provider default applied.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence.unwrap_or(DEFAULT_CONFIDENCE)
    }

    /// Check score and confidence ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.score > MAX_SCORE {
            return Err(DomainError::ScoreOutOfRange {
                score: u32::from(self.score),
            });
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(DomainError::ConfidenceOutOfRange { confidence });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_confidence_defaults_to_half() {
        let reading = SentimentReading::try_new(55, SentimentLabel::Neutral).unwrap();
        assert!((reading.confidence() - DEFAULT_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn score_above_hundred_is_rejected() {
        let err = SentimentReading::try_new(101, SentimentLabel::Euphoric).unwrap_err();
        assert_eq!(err, DomainError::ScoreOutOfRange { score: 101 });
    }

    #[test]
    fn confidence_outside_unit_interval_is_rejected() {
        let reading = SentimentReading::try_new(50, SentimentLabel::Neutral)
            .unwrap()
            .with_confidence(1.5);
        assert!(matches!(
            reading.validate(),
            Err(DomainError::ConfidenceOutOfRange { .. })
        ));
    }

    #[test]
    fn fallback_is_neutral_with_zero_confidence() {
        let fallback = SentimentReading::neutral_fallback();
        assert_eq!(fallback.score, 50);
        assert_eq!(fallback.label, SentimentLabel::Neutral);
        assert_eq!(fallback.confidence, Some(0.0));
    }

    #[test]
    fn provider_payload_decodes_with_capitalized_label() {
        let json = r#"{"score":72,"label":"Bullish","summary":"risk-on","trendingTopics":["eth"]}"#;
        let reading: SentimentReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.label, SentimentLabel::Bullish);
        assert_eq!(reading.confidence, None);
        assert_eq!(reading.trending_topics, vec!["eth".to_string()]);
    }

    #[test]
    fn label_from_score_uses_band_edges() {
        assert_eq!(SentimentLabel::from_score(80), SentimentLabel::Euphoric);
        assert_eq!(SentimentLabel::from_score(60), SentimentLabel::Bullish);
        assert_eq!(SentimentLabel::from_score(59), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(40), SentimentLabel::Bearish);
    }
}
