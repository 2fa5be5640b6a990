//! Cost and profit estimation.
//!
//! [`PaperModel`] is the deterministic mock used for paper trading and for
//! previews. The gas helpers price real ledger quotes in USD.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Wei per unit of native gas token.
const NATIVE_DECIMALS: u32 = 18;

/// Parameters of the paper-trading outcome model.
///
/// `profit = amount * (base_rate * strategy_count + bonus)` where `bonus`
/// applies only when the score is strictly above `bonus_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperModel {
    /// Nominal gas cost per execution, USD.
    pub gas_cost_usd: Decimal,
    /// Profit rate contributed by each active strategy.
    pub base_rate: Decimal,
    /// Extra rate when sentiment is above the threshold.
    pub sentiment_bonus: Decimal,
    pub bonus_threshold: u8,
}

impl Default for PaperModel {
    fn default() -> Self {
        Self {
            gas_cost_usd: dec!(3.5),
            base_rate: dec!(0.005),
            sentiment_bonus: dec!(0.002),
            bonus_threshold: 60,
        }
    }
}

impl PaperModel {
    /// Mock profit for `amount` spread over `strategy_count` strategies.
    #[must_use]
    pub fn estimated_profit(&self, amount: Decimal, strategy_count: usize, score: u8) -> Decimal {
        let bonus = if score > self.bonus_threshold {
            self.sentiment_bonus
        } else {
            Decimal::ZERO
        };
        amount * (self.base_rate * Decimal::from(strategy_count) + bonus)
    }
}

/// Gas cost of a transaction in native units and USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCost {
    pub native: Decimal,
    pub usd: Decimal,
}

/// Price `gas_units` at `gas_price_wei`, converting through `native_price_usd`.
///
/// Returns `None` without a positive native price, or if the product does
/// not fit in a decimal.
#[must_use]
pub fn gas_cost(gas_units: u64, gas_price_wei: u128, native_price_usd: Decimal) -> Option<GasCost> {
    if native_price_usd <= Decimal::ZERO {
        return None;
    }
    let wei = u128::from(gas_units).checked_mul(gas_price_wei)?;
    let native = Decimal::try_from_i128_with_scale(i128::try_from(wei).ok()?, NATIVE_DECIMALS).ok()?;
    let usd = native.checked_mul(native_price_usd)?;
    Some(GasCost {
        native: native.normalize(),
        usd: usd.round_dp(6).normalize(),
    })
}

/// Scale a token amount to integer base units (e.g. 6 decimals for USDC).
///
/// Fractions below one base unit are truncated. Returns `None` for negative
/// amounts or on overflow.
#[must_use]
pub fn to_base_units(amount: Decimal, decimals: u32) -> Option<u128> {
    if amount.is_sign_negative() {
        return None;
    }
    let scale = Decimal::from(10u64.checked_pow(decimals)?);
    let scaled = amount.checked_mul(scale)?.trunc();
    scaled.to_string().parse::<u128>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_profit_includes_bonus_above_sixty() {
        let model = PaperModel::default();
        assert_eq!(model.estimated_profit(dec!(1000), 2, 70), dec!(12.0));
    }

    #[test]
    fn paper_profit_without_bonus_at_fifty() {
        let model = PaperModel::default();
        assert_eq!(model.estimated_profit(dec!(1000), 2, 50), dec!(10.0));
    }

    #[test]
    fn bonus_threshold_is_exclusive() {
        let model = PaperModel::default();
        assert_eq!(model.estimated_profit(dec!(1000), 1, 60), dec!(5));
        assert_eq!(model.estimated_profit(dec!(1000), 1, 61), dec!(7));
    }

    #[test]
    fn gas_cost_converts_wei_to_usd() {
        // 100k gas at 20 gwei = 0.002 native; at $3000 that is $6.
        let cost = gas_cost(100_000, 20_000_000_000, dec!(3000)).unwrap();
        assert_eq!(cost.native, dec!(0.002));
        assert_eq!(cost.usd, dec!(6));
    }

    #[test]
    fn gas_cost_needs_a_native_price() {
        assert_eq!(gas_cost(100_000, 20_000_000_000, Decimal::ZERO), None);
        assert_eq!(gas_cost(100_000, 20_000_000_000, dec!(-1)), None);
    }

    #[test]
    fn base_units_truncate_sub_unit_fractions() {
        assert_eq!(to_base_units(dec!(1.2345678), 6), Some(1_234_567));
        assert_eq!(to_base_units(dec!(2), 18), Some(2_000_000_000_000_000_000));
        assert_eq!(to_base_units(dec!(-1), 6), None);
    }
}
