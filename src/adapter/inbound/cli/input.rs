//! Command-line inputs: allocation files and inline sentiment readings.

use std::path::Path;

use super::command::SentimentArgs;
use crate::domain::allocation::Allocation;
use crate::domain::sentiment::{SentimentLabel, SentimentReading};
use crate::error::Result;

/// Read and validate an allocation from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read, is not a valid allocation
/// document, or violates an allocation invariant.
pub fn load_allocation(path: &Path) -> Result<Allocation> {
    let content = std::fs::read_to_string(path)?;
    let allocation: Allocation = serde_json::from_str(&content)?;
    allocation.validate()?;
    Ok(allocation)
}

/// Reading described by `--score`, `--label` and `--confidence`, if any.
///
/// # Errors
/// Returns an error if the score or confidence is out of range.
pub fn sentiment_reading(args: &SentimentArgs) -> Result<Option<SentimentReading>> {
    let Some(score) = args.score else {
        return Ok(None);
    };
    let label = args.label.unwrap_or_else(|| SentimentLabel::from_score(score));
    let mut reading = SentimentReading::try_new(score, label)?;
    if let Some(confidence) = args.confidence {
        reading = reading.with_confidence(confidence);
        reading.validate()?;
    }
    Ok(Some(reading))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::allocation::Condition;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_camel_case_allocation() {
        let file = write_temp(
            r#"{
                "id": "alloc-9",
                "userId": "user-9",
                "ecosystem": "defi",
                "assetId": "eth",
                "amount": "250.5",
                "layers": [
                    {"strategyId": "momentum", "condition": "bullish", "weight": 60},
                    {"strategyId": "hedge", "condition": "HighVolatility", "weight": 40}
                ]
            }"#,
        );

        let allocation = load_allocation(file.path()).unwrap();
        assert_eq!(allocation.amount, dec!(250.5));
        assert_eq!(allocation.layers.len(), 2);
        assert_eq!(allocation.layers[1].condition, Condition::HighVolatility);
    }

    #[test]
    fn rejects_invalid_allocation() {
        let file = write_temp(
            r#"{"id":"a","userId":"u","ecosystem":"defi","assetId":"eth","amount":"0"}"#,
        );
        assert!(load_allocation(file.path()).is_err());
    }

    #[test]
    fn no_score_means_no_reading() {
        assert!(sentiment_reading(&SentimentArgs::default()).unwrap().is_none());
    }

    #[test]
    fn label_defaults_from_score() {
        let args = SentimentArgs {
            score: Some(85),
            ..SentimentArgs::default()
        };
        let reading = sentiment_reading(&args).unwrap().unwrap();
        assert_eq!(reading.label, SentimentLabel::Euphoric);
    }

    #[test]
    fn rejects_confidence_above_one() {
        let args = SentimentArgs {
            score: Some(50),
            label: None,
            confidence: Some(1.2),
        };
        assert!(sentiment_reading(&args).is_err());
    }
}
