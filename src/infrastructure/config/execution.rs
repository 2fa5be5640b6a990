//! Paper trading model configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::estimate::PaperModel;

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Nominal gas cost per execution, also the live estimate fallback.
    #[serde(default = "default_paper_gas_cost_usd")]
    pub paper_gas_cost_usd: Decimal,
    #[serde(default = "default_paper_base_rate")]
    pub paper_base_rate: Decimal,
    #[serde(default = "default_paper_sentiment_bonus")]
    pub paper_sentiment_bonus: Decimal,
    /// The bonus applies only to scores strictly above this.
    #[serde(default = "default_paper_bonus_threshold")]
    pub paper_bonus_threshold: u8,
}

fn default_paper_gas_cost_usd() -> Decimal {
    dec!(3.5)
}

fn default_paper_base_rate() -> Decimal {
    dec!(0.005)
}

fn default_paper_sentiment_bonus() -> Decimal {
    dec!(0.002)
}

const fn default_paper_bonus_threshold() -> u8 {
    60
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            paper_gas_cost_usd: default_paper_gas_cost_usd(),
            paper_base_rate: default_paper_base_rate(),
            paper_sentiment_bonus: default_paper_sentiment_bonus(),
            paper_bonus_threshold: default_paper_bonus_threshold(),
        }
    }
}

impl ExecutionConfig {
    #[must_use]
    pub fn paper_model(&self) -> PaperModel {
        PaperModel {
            gas_cost_usd: self.paper_gas_cost_usd,
            base_rate: self.paper_base_rate,
            sentiment_bonus: self.paper_sentiment_bonus,
            bonus_threshold: self.paper_bonus_threshold,
        }
    }
}
