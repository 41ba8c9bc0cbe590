//! Stop-loss / take-profit derivation from an entry price and R-multiple.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::CalcError;
use super::symbol::{InstrumentClass, SymbolKey};
use super::valuation::fx_pip_size;

/// Price step used to convert gold ticks into a price delta when planning.
///
/// Sizing accepts a broker-configurable gold tick size, but planning always
/// assumes 0.01. A broker with a different tick size gets a planned stop
/// that disagrees with the sized risk.
// TODO: thread the gold tick size from SizingInput into PlanInput.
const GOLD_PLANNING_TICK: Decimal = dec!(0.01);

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            other => Err(format!("direction must be LONG or SHORT, got {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input snapshot for SL/TP planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInput {
    pub symbol: SymbolKey,
    pub direction: Direction,
    pub entry_price: Decimal,
    /// Stop distance in pips (FX) or ticks (gold).
    pub stop_distance: Decimal,
    /// Take-profit distance as a multiple of the risk distance, e.g. 2 = 2R.
    pub reward_to_risk: Decimal,
}

/// Planned stop-loss and take-profit prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub sl_price: Decimal,
    pub tp_price: Decimal,
    /// |entry - SL| in price terms.
    pub risk_distance_price: Decimal,
    /// |TP - entry| in price terms.
    pub reward_distance_price: Decimal,
}

/// Derive SL/TP prices from the entry, direction, and R-multiple.
///
/// # Errors
///
/// `CalcError::Validation` when the entry price, stop distance, or
/// R-multiple is not positive.
pub fn compute_trade_plan(input: &PlanInput) -> Result<PlanResult, CalcError> {
    if input.entry_price <= Decimal::ZERO {
        return Err(CalcError::validation("entry price must be > 0"));
    }
    if input.stop_distance <= Decimal::ZERO {
        return Err(CalcError::validation("stop distance must be > 0"));
    }
    if input.reward_to_risk <= Decimal::ZERO {
        return Err(CalcError::validation("R multiple must be > 0"));
    }

    let step = match input.symbol.class() {
        InstrumentClass::Metal => GOLD_PLANNING_TICK,
        InstrumentClass::ForeignExchange => fx_pip_size(input.symbol),
    };

    let risk_distance_price = input.stop_distance * step;
    let reward_distance_price = risk_distance_price * input.reward_to_risk;

    let (sl_price, tp_price) = match input.direction {
        Direction::Long => (
            input.entry_price - risk_distance_price,
            input.entry_price + reward_distance_price,
        ),
        Direction::Short => (
            input.entry_price + risk_distance_price,
            input.entry_price - reward_distance_price,
        ),
    };

    Ok(PlanResult {
        sl_price,
        tp_price,
        risk_distance_price,
        reward_distance_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> PlanInput {
        PlanInput {
            symbol: SymbolKey::Xauusd,
            direction: Direction::Long,
            entry_price: dec!(2650),
            stop_distance: dec!(20),
            reward_to_risk: dec!(2),
        }
    }

    #[test]
    fn test_gold_long_plan() {
        // 20 ticks * 0.01 = 0.2 risk distance, 0.4 reward at 2R.
        let plan = compute_trade_plan(&base_input()).unwrap();

        assert_eq!(plan.risk_distance_price, dec!(0.2));
        assert_eq!(plan.reward_distance_price, dec!(0.4));
        assert_eq!(plan.sl_price, dec!(2649.8));
        assert_eq!(plan.tp_price, dec!(2650.4));
    }

    #[test]
    fn test_gold_short_plan() {
        let mut input = base_input();
        input.direction = Direction::Short;
        let plan = compute_trade_plan(&input).unwrap();

        assert_eq!(plan.sl_price, dec!(2650.2));
        assert_eq!(plan.tp_price, dec!(2649.6));
    }

    #[test]
    fn test_fx_plan_uses_pip_size() {
        let input = PlanInput {
            symbol: SymbolKey::Eurusd,
            direction: Direction::Long,
            entry_price: dec!(1.1000),
            stop_distance: dec!(20),
            reward_to_risk: dec!(3),
        };
        let plan = compute_trade_plan(&input).unwrap();

        assert_eq!(plan.risk_distance_price, dec!(0.0020));
        assert_eq!(plan.sl_price, dec!(1.0980));
        assert_eq!(plan.tp_price, dec!(1.1060));
    }

    #[test]
    fn test_jpy_plan_uses_bigger_pip() {
        let input = PlanInput {
            symbol: SymbolKey::Usdjpy,
            direction: Direction::Short,
            entry_price: dec!(150.00),
            stop_distance: dec!(30),
            reward_to_risk: dec!(1),
        };
        let plan = compute_trade_plan(&input).unwrap();

        assert_eq!(plan.sl_price, dec!(150.30));
        assert_eq!(plan.tp_price, dec!(149.70));
    }

    #[test]
    fn test_long_ordering_invariant() {
        let plan = compute_trade_plan(&base_input()).unwrap();
        let entry = base_input().entry_price;

        assert!(plan.sl_price < entry);
        assert!(entry < plan.tp_price);
    }

    #[test]
    fn test_short_ordering_invariant() {
        let mut input = base_input();
        input.direction = Direction::Short;
        let plan = compute_trade_plan(&input).unwrap();

        assert!(plan.tp_price < input.entry_price);
        assert!(input.entry_price < plan.sl_price);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut input = base_input();
        input.entry_price = Decimal::ZERO;
        assert!(matches!(
            compute_trade_plan(&input),
            Err(CalcError::Validation(_))
        ));

        let mut input = base_input();
        input.stop_distance = dec!(-1);
        assert!(matches!(
            compute_trade_plan(&input),
            Err(CalcError::Validation(_))
        ));

        let mut input = base_input();
        input.reward_to_risk = Decimal::ZERO;
        assert!(matches!(
            compute_trade_plan(&input),
            Err(CalcError::Validation(_))
        ));
    }
}
