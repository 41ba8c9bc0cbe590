//! Instrument valuation: the account-currency value of one pip (FX) or one
//! tick (metal) for a single standard lot.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::CalcError;
use super::sizing::SizingInput;
use super::symbol::{InstrumentClass, SymbolKey, FX_LOT_SIZE};

/// CHF value of one risk unit (pip or tick) for 1.0 lot.
///
/// FX pairs quoted directly in CHF need no conversion. Everything else uses
/// the USD quote as an approximation and converts with the USD->CHF rate.
/// The approximation is a known MVP simplification, not corrected here.
pub fn value_per_unit_per_lot(input: &SizingInput) -> Result<Decimal, CalcError> {
    match input.symbol.class() {
        InstrumentClass::Metal => {
            if input.contract_size <= Decimal::ZERO {
                return Err(CalcError::validation("gold contract size must be > 0"));
            }
            if input.tick_size <= Decimal::ZERO {
                return Err(CalcError::validation("gold tick size must be > 0"));
            }
            let tick_value_usd = input.contract_size * input.tick_size;
            Ok(tick_value_usd * input.conversion_rate)
        }
        InstrumentClass::ForeignExchange => {
            let ps = fx_pip_size(input.symbol);
            if input.symbol.quoted_in_account_currency() {
                Ok(FX_LOT_SIZE * ps)
            } else {
                let pip_value_usd = FX_LOT_SIZE * ps;
                Ok(pip_value_usd * input.conversion_rate)
            }
        }
    }
}

/// Market exposure for a final lot count: base-currency units (FX) or
/// ounces (metal). Rounded half away from zero on the product.
pub fn exposure_units(symbol: SymbolKey, lots: Decimal, contract_size: Decimal) -> Decimal {
    let units = match symbol.class() {
        InstrumentClass::Metal => lots * contract_size,
        InstrumentClass::ForeignExchange => lots * FX_LOT_SIZE,
    };
    units.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Display label for the exposure unit.
pub fn unit_label(symbol: SymbolKey) -> &'static str {
    match symbol.class() {
        InstrumentClass::Metal => "oz",
        InstrumentClass::ForeignExchange => "units",
    }
}

/// Display label for the stop-distance unit.
pub fn distance_label(symbol: SymbolKey) -> &'static str {
    match symbol.class() {
        InstrumentClass::Metal => "ticks",
        InstrumentClass::ForeignExchange => "pips",
    }
}

/// Pip size for an FX symbol, per the JPY-quote rule in the symbol table.
pub(crate) fn fx_pip_size(symbol: SymbolKey) -> Decimal {
    // Symbols without a static pip size are metal and never reach here.
    symbol.spec().pip_size.unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::symbol::Currency;
    use rust_decimal_macros::dec;

    fn input_for(symbol: SymbolKey) -> SizingInput {
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
    fn test_chf_quoted_pair_needs_no_conversion() {
        // 100,000 * 0.0001 = 10 CHF per pip, regardless of the rate.
        let value = value_per_unit_per_lot(&input_for(SymbolKey::Usdchf)).unwrap();
        assert_eq!(value, dec!(10));
    }

    #[test]
    fn test_usd_quoted_pair_converts() {
        // 100,000 * 0.0001 = 10 USD per pip -> 9 CHF at 0.9.
        let value = value_per_unit_per_lot(&input_for(SymbolKey::Eurusd)).unwrap();
        assert_eq!(value, dec!(9));
    }

    #[test]
    fn test_jpy_pair_uses_bigger_pip() {
        // 100,000 * 0.01 = 1,000 USD per pip -> 900 CHF at 0.9.
        let value = value_per_unit_per_lot(&input_for(SymbolKey::Usdjpy)).unwrap();
        assert_eq!(value, dec!(900));
    }

    #[test]
    fn test_gold_tick_value() {
        // 100 oz * 0.01 = 1 USD per tick -> 0.9 CHF at 0.9.
        let value = value_per_unit_per_lot(&input_for(SymbolKey::Xauusd)).unwrap();
        assert_eq!(value, dec!(0.9));
    }

    #[test]
    fn test_gold_rejects_bad_contract_spec() {
        let mut input = input_for(SymbolKey::Xauusd);
        input.contract_size = Decimal::ZERO;
        assert!(matches!(
            value_per_unit_per_lot(&input),
            Err(CalcError::Validation(_))
        ));

        let mut input = input_for(SymbolKey::Xauusd);
        input.tick_size = dec!(-0.01);
        assert!(matches!(
            value_per_unit_per_lot(&input),
            Err(CalcError::Validation(_))
        ));
    }

    #[test]
    fn test_fx_exposure_rounds_on_product() {
        assert_eq!(
            exposure_units(SymbolKey::Usdchf, dec!(0.12), dec!(100)),
            dec!(12000)
        );
    }

    #[test]
    fn test_gold_exposure_in_ounces() {
        assert_eq!(
            exposure_units(SymbolKey::Xauusd, dec!(1.38), dec!(100)),
            dec!(138)
        );
        // Half rounds away from zero.
        assert_eq!(
            exposure_units(SymbolKey::Xauusd, dec!(1.385), dec!(100)),
            dec!(139)
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(unit_label(SymbolKey::Xauusd), "oz");
        assert_eq!(distance_label(SymbolKey::Xauusd), "ticks");
        assert_eq!(unit_label(SymbolKey::Eurusd), "units");
        assert_eq!(distance_label(SymbolKey::Eurusd), "pips");
    }
}
