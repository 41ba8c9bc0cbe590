//! Input validation for the position size calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::CalcError;
use super::sizing::SizingInput;
use super::symbol::ACCOUNT_CURRENCY;

const MAX_RISK_PCT: Decimal = dec!(5);

/// Check a sizing input before any computation. The first failing check
/// wins; metal-specific fields (contract size, tick size) are checked by the
/// valuation model instead.
pub fn validate(input: &SizingInput) -> Result<(), CalcError> {
    if input.account_currency != ACCOUNT_CURRENCY {
        return Err(CalcError::validation(format!(
            "only {ACCOUNT_CURRENCY} accounts are supported"
        )));
    }
    if input.balance <= Decimal::ZERO {
        return Err(CalcError::validation("balance must be > 0"));
    }
    if input.risk_pct <= Decimal::ZERO || input.risk_pct > MAX_RISK_PCT {
        return Err(CalcError::validation(
            "risk % must be between 0 and 5",
        ));
    }
    if input.stop_distance <= Decimal::ZERO {
        return Err(CalcError::validation("stop distance must be > 0"));
    }
    if input.lot_step <= Decimal::ZERO {
        return Err(CalcError::validation("lot step must be > 0"));
    }
    if input.conversion_rate <= Decimal::ZERO {
        return Err(CalcError::validation("USD\u{2192}CHF rate must be > 0"));
    }
    Ok(())
}
