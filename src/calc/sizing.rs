//! Position size calculation under the fixed fractional-risk model.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::CalcError;
use super::symbol::{Currency, SymbolKey};
use super::validate::validate;
use super::valuation;

/// Immutable snapshot of everything the sizing calculation needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingInput {
    /// Account denomination; only CHF is accepted.
    pub account_currency: Currency,

    /// Account balance in CHF.
    pub balance: Decimal,

    /// Percent of balance to risk on this trade (0 < x <= 5).
    pub risk_pct: Decimal,

    pub symbol: SymbolKey,

    /// Stop distance in pips (FX) or ticks (gold).
    pub stop_distance: Decimal,

    /// USD->CHF conversion rate for USD-quoted instruments.
    pub conversion_rate: Decimal,

    /// Minimum broker lot increment, e.g. 0.01.
    pub lot_step: Decimal,

    /// Ounces per 1.0 lot (gold only; broker-dependent, commonly 100).
    pub contract_size: Decimal,

    /// Gold tick size (broker-dependent, commonly 0.01).
    pub tick_size: Decimal,
}

/// Computed sizing result. Never constructed with `lots <= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizingResult {
    /// CHF amount at risk if the stop is hit.
    pub risk_money: Decimal,

    /// CHF per pip (FX) or tick (gold) for 1.0 lot.
    pub value_per_unit_per_lot: Decimal,

    /// CHF loss per 1.0 lot at the stop (ignores spread/fees).
    pub stop_value_per_lot: Decimal,

    /// Lot size, rounded down to the broker's lot step.
    pub lots: Decimal,

    /// Approximate market exposure: base-currency units (FX) or oz (gold).
    pub exposure_units: Decimal,

    /// "units" or "oz".
    pub unit_label: &'static str,

    /// "pips" or "ticks".
    pub distance_label: &'static str,
}

const PCT: Decimal = dec!(100);

/// Round `value` down to a multiple of `step`.
///
/// Scaling by the reciprocal keeps the floor on an integer grid instead of
/// multiplying the step back through an already-imprecise quotient.
pub fn floor_to_step(value: Decimal, step: Decimal) -> Decimal {
    let inv = Decimal::ONE / step;
    (value * inv).floor() / inv
}

/// Convert a risk budget and stop distance into a broker-ready lot size.
///
/// # Errors
///
/// `CalcError::Validation` for out-of-domain input; `CalcError::ZeroLot`
/// when the ideal size rounds down to zero lots.
pub fn compute_position_size(input: &SizingInput) -> Result<SizingResult, CalcError> {
    validate(input)?;

    let risk_money = input.balance * (input.risk_pct / PCT);
    let value_per_unit_per_lot = valuation::value_per_unit_per_lot(input)?;

    let stop_value_per_lot = input.stop_distance * value_per_unit_per_lot;
    let raw_lots = risk_money / stop_value_per_lot;
    let lots = floor_to_step(raw_lots, input.lot_step);

    if lots <= Decimal::ZERO {
        return Err(CalcError::ZeroLot);
    }

    Ok(SizingResult {
        risk_money,
        value_per_unit_per_lot,
        stop_value_per_lot,
        lots,
        exposure_units: valuation::exposure_units(input.symbol, lots, input.contract_size),
        unit_label: valuation::unit_label(input.symbol),
        distance_label: valuation::distance_label(input.symbol),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input(symbol: SymbolKey) -> SizingInput {
        SizingInput {
            account_currency: Currency::Chf,
            balance: dec!(5000),
            risk_pct: dec!(0.5),
            symbol,
            stop_distance: dec!(20),
            conversion_rate: dec!(0.9),
            lot_step: dec!(0.01),
            contract_size: dec!(100),
            tick_size: dec!(0.01),
        }
    }

    #[test]
    fn test_fx_chf_quote_scenario() {
        // USDCHF: 5000 CHF, 0.5% risk, 20 pip stop.
        let result = compute_position_size(&base_input(SymbolKey::Usdchf)).unwrap();

        assert_eq!(result.risk_money, dec!(25));
        assert_eq!(result.value_per_unit_per_lot, dec!(10));
        assert_eq!(result.stop_value_per_lot, dec!(200));
        assert_eq!(result.lots, dec!(0.12));
        assert_eq!(result.exposure_units, dec!(12000));
        assert_eq!(result.unit_label, "units");
        assert_eq!(result.distance_label, "pips");
    }

    #[test]
    fn test_gold_scenario() {
        // XAUUSD: raw lots = 25 / 18 = 1.3888..., floored to 1.38.
        let result = compute_position_size(&base_input(SymbolKey::Xauusd)).unwrap();

        assert_eq!(result.risk_money, dec!(25));
        assert_eq!(result.value_per_unit_per_lot, dec!(0.9));
        assert_eq!(result.stop_value_per_lot, dec!(18));
        assert_eq!(result.lots, dec!(1.38));
        assert_eq!(result.exposure_units, dec!(138));
        assert_eq!(result.unit_label, "oz");
        assert_eq!(result.distance_label, "ticks");
    }

    #[test]
    fn test_risk_money_is_exact_fraction() {
        for (balance, risk_pct, expected) in [
            (dec!(5000), dec!(0.5), dec!(25)),
            (dec!(12345), dec!(1), dec!(123.45)),
            (dec!(100), dec!(5), dec!(5)),
        ] {
            let mut input = base_input(SymbolKey::Usdchf);
            input.balance = balance;
            input.risk_pct = risk_pct;
            let result = compute_position_size(&input).unwrap();
            assert_eq!(result.risk_money, expected);
        }
    }

    #[test]
    fn test_lots_never_round_up() {
        let result = compute_position_size(&base_input(SymbolKey::Xauusd)).unwrap();
        let raw_lots = result.risk_money / result.stop_value_per_lot;

        assert!(result.lots <= raw_lots);
        assert!(raw_lots - result.lots < dec!(0.01));
        // Loss at the stop stays within the risk budget.
        assert!(result.lots * result.stop_value_per_lot <= result.risk_money);
    }

    #[test]
    fn test_lots_are_step_multiples() {
        let mut input = base_input(SymbolKey::Usdchf);
        input.lot_step = dec!(0.05);
        let result = compute_position_size(&input).unwrap();

        // 0.125 raw -> 0.10 at a 0.05 step.
        assert_eq!(result.lots, dec!(0.10));
        assert_eq!(result.lots % input.lot_step, Decimal::ZERO);
    }

    #[test]
    fn test_floor_to_step_idempotent() {
        for value in [dec!(0.125), dec!(1.3888), dec!(7), dec!(0.019999)] {
            let once = floor_to_step(value, dec!(0.01));
            assert_eq!(floor_to_step(once, dec!(0.01)), once);
        }
    }

    #[test]
    fn test_zero_lot_error() {
        // riskMoney / stopValuePerLot = 25 / 200 = 0.125 < lotStep 0.5.
        let mut input = base_input(SymbolKey::Usdchf);
        input.lot_step = dec!(0.5);

        assert_eq!(compute_position_size(&input), Err(CalcError::ZeroLot));
    }

    #[test]
    fn test_zero_lot_on_tiny_balance() {
        let mut input = base_input(SymbolKey::Usdchf);
        input.balance = dec!(10);

        assert_eq!(compute_position_size(&input), Err(CalcError::ZeroLot));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut input = base_input(SymbolKey::Usdchf);
        input.risk_pct = Decimal::ZERO;

        assert!(matches!(
            compute_position_size(&input),
            Err(CalcError::Validation(_))
        ));
    }

    #[test]
    fn test_gold_spec_failure_surfaces_as_validation() {
        let mut input = base_input(SymbolKey::Xauusd);
        input.tick_size = Decimal::ZERO;

        assert!(matches!(
            compute_position_size(&input),
            Err(CalcError::Validation(_))
        ));
    }
}
