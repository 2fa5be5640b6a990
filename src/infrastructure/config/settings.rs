//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the keeper key comes only from
//! the `KEEPER_PRIVATE_KEY` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use rebalancer::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::execution::ExecutionConfig;
use super::ledger::{LedgerConfig, KEEPER_PRIVATE_KEY_ENV};
use super::logging::LoggingConfig;
use super::sentiment::SentimentConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Ledger connection. Disabled when no vault address is set.
    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub sentiment: SentimentConfig,

    /// Path to SQLite database file.
    ///
    /// Defaults to "rebalancer.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,
}

fn default_database_path() -> String {
    "rebalancer.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            ledger: LedgerConfig::default(),
            execution: ExecutionConfig::default(),
            sentiment: SentimentConfig::default(),
            database: default_database_path(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the keeper key from the environment before validating.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.ledger.private_key = std::env::var(KEEPER_PRIVATE_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize tracing from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        let ledger = &self.ledger;
        if ledger.is_enabled() {
            if ledger.rpc_url.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "rpc_url" }.into());
            }
            url::Url::parse(&ledger.rpc_url).map_err(|e| ConfigError::InvalidValue {
                field: "rpc_url",
                reason: e.to_string(),
            })?;
            if ledger.native_price_usd <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "native_price_usd",
                    reason: "must be greater than 0 when a vault is configured".to_string(),
                }
                .into());
            }
        }
        if ledger.confirmation_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "confirmation_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if ledger.native_price_usd < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "native_price_usd",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }

        let execution = &self.execution;
        if execution.paper_gas_cost_usd < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "paper_gas_cost_usd",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        for (field, rate) in [
            ("paper_base_rate", execution.paper_base_rate),
            ("paper_sentiment_bonus", execution.paper_sentiment_bonus),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be between 0 and 1".to_string(),
                }
                .into());
            }
        }
        if execution.paper_bonus_threshold > 100 {
            return Err(ConfigError::InvalidValue {
                field: "paper_bonus_threshold",
                reason: "must be between 0 and 100".to_string(),
            }
            .into());
        }

        let sentiment = &self.sentiment;
        if let Some(url) = sentiment.url.as_deref() {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "sentiment.url" }.into());
            }
            url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field: "sentiment.url",
                reason: e.to_string(),
            })?;
        }
        if sentiment.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if sentiment.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.database, "rebalancer.db");
        assert!(!config.ledger.is_enabled());
        assert_eq!(config.ledger.confirmation_timeout_secs, 300);
        assert_eq!(config.execution.paper_gas_cost_usd, dec!(3.5));
        assert_eq!(config.sentiment.max_attempts, 3);
    }

    #[test]
    fn parses_full_config() {
        let toml = r#"
            database = "data/rebalancer.db"

            [logging]
            level = "debug"
            format = "json"

            [ledger]
            rpc_url = "http://127.0.0.1:8545"
            chain_id = 31337
            vault_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            native_price_usd = 3000
            confirmation_timeout_secs = 120

            [ledger.assets.steth]
            address = "0xae7ab96520DE3A18E5e111B5EaAb095312D7fE84"
            decimals = 18

            [execution]
            paper_gas_cost_usd = 2.0
            paper_bonus_threshold = 70

            [sentiment]
            url = "http://localhost:9000/sentiment"
            base_delay_ms = 500
        "#;

        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.ledger.chain_id, 31337);
        assert_eq!(config.ledger.native_price_usd, dec!(3000));
        assert!(config.ledger.is_enabled());
        assert!(!config.ledger.asset_registry().resolve("steth").is_native_fallback());
        assert_eq!(config.execution.paper_model().bonus_threshold, 70);
        assert_eq!(config.sentiment.endpoint(), Some("http://localhost:9000/sentiment"));
        assert_eq!(config.sentiment.retry_policy().max_attempts, 3);
    }

    #[test]
    fn enabled_ledger_requires_rpc_url() {
        let toml = r#"
            [ledger]
            vault_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        "#;
        assert!(matches!(
            Config::parse_toml(toml),
            Err(Error::Config(ConfigError::MissingField { field: "rpc_url" }))
        ));
    }

    #[test]
    fn enabled_ledger_requires_native_price() {
        let toml = r#"
            [ledger]
            rpc_url = "http://127.0.0.1:8545"
            vault_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        "#;
        assert!(matches!(
            Config::parse_toml(toml),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "native_price_usd",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_zero_confirmation_timeout() {
        let toml = "[ledger]\nconfirmation_timeout_secs = 0\n";
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn rejects_rate_above_one() {
        let toml = "[execution]\npaper_base_rate = 1.5\n";
        assert!(matches!(
            Config::parse_toml(toml),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "paper_base_rate",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_zero_attempts() {
        let toml = "[sentiment]\nmax_attempts = 0\n";
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            Config::parse_toml("database = ["),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }
}
