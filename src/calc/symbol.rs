//! Static symbol table for the supported instruments.
//!
//! Each symbol carries its instrument class, quote currency, and (for FX)
//! pip size, so the rest of the engine never branches on string suffixes.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The single account currency supported by the MVP.
pub const ACCOUNT_CURRENCY: Currency = Currency::Chf;

/// Standard FX lot: 100,000 base-currency units.
pub const FX_LOT_SIZE: Decimal = dec!(100_000);

/// Currencies that appear as quote currencies in the symbol set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Chf,
    Usd,
    Jpy,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Chf => "CHF",
            Currency::Usd => "USD",
            Currency::Jpy => "JPY",
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CHF" => Ok(Currency::Chf),
            "USD" => Ok(Currency::Usd),
            "JPY" => Ok(Currency::Jpy),
            other => Err(format!("unknown currency: {other}")),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad instrument class driving the valuation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentClass {
    /// Spot metal (XAUUSD), sized in ticks.
    Metal,
    /// Currency pair, sized in pips.
    ForeignExchange,
}

/// The tradable symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SymbolKey {
    Xauusd,
    Eurusd,
    Usdchf,
    Usdjpy,
}

/// Per-symbol static specification.
#[derive(Debug, Clone, Copy)]
pub struct SymbolSpec {
    pub class: InstrumentClass,
    pub quote_currency: Currency,
    /// Pip size for FX symbols; `None` for metal, where the tick size is
    /// broker-configurable and supplied with the sizing input.
    pub pip_size: Option<Decimal>,
}

const PIP: Decimal = dec!(0.0001);
const PIP_JPY: Decimal = dec!(0.01);

impl SymbolKey {
    pub const ALL: [SymbolKey; 4] = [
        SymbolKey::Xauusd,
        SymbolKey::Eurusd,
        SymbolKey::Usdchf,
        SymbolKey::Usdjpy,
    ];

    pub fn spec(&self) -> SymbolSpec {
        match self {
            SymbolKey::Xauusd => SymbolSpec {
                class: InstrumentClass::Metal,
                quote_currency: Currency::Usd,
                pip_size: None,
            },
            SymbolKey::Eurusd => SymbolSpec {
                class: InstrumentClass::ForeignExchange,
                quote_currency: Currency::Usd,
                pip_size: Some(PIP),
            },
            SymbolKey::Usdchf => SymbolSpec {
                class: InstrumentClass::ForeignExchange,
                quote_currency: Currency::Chf,
                pip_size: Some(PIP),
            },
            SymbolKey::Usdjpy => SymbolSpec {
                class: InstrumentClass::ForeignExchange,
                quote_currency: Currency::Jpy,
                pip_size: Some(PIP_JPY),
            },
        }
    }

    pub fn class(&self) -> InstrumentClass {
        self.spec().class
    }

    /// True if the symbol is quoted directly in the account currency, in
    /// which case no conversion rate is applied during valuation.
    pub fn quoted_in_account_currency(&self) -> bool {
        self.spec().quote_currency == ACCOUNT_CURRENCY
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKey::Xauusd => "XAUUSD",
            SymbolKey::Eurusd => "EURUSD",
            SymbolKey::Usdchf => "USDCHF",
            SymbolKey::Usdjpy => "USDJPY",
        }
    }
}

impl FromStr for SymbolKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "XAUUSD" => Ok(SymbolKey::Xauusd),
            "EURUSD" => Ok(SymbolKey::Eurusd),
            "USDCHF" => Ok(SymbolKey::Usdchf),
            "USDJPY" => Ok(SymbolKey::Usdjpy),
            other => Err(format!(
                "unsupported symbol: {other} (expected one of XAUUSD, EURUSD, USDCHF, USDJPY)"
            )),
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpy_pip_size() {
        assert_eq!(SymbolKey::Usdjpy.spec().pip_size, Some(dec!(0.01)));
        assert_eq!(SymbolKey::Eurusd.spec().pip_size, Some(dec!(0.0001)));
        assert_eq!(SymbolKey::Usdchf.spec().pip_size, Some(dec!(0.0001)));
    }

    #[test]
    fn test_metal_has_no_static_pip() {
        assert_eq!(SymbolKey::Xauusd.spec().pip_size, None);
        assert_eq!(SymbolKey::Xauusd.class(), InstrumentClass::Metal);
    }

    #[test]
    fn test_chf_quote_detection() {
        assert!(SymbolKey::Usdchf.quoted_in_account_currency());
        assert!(!SymbolKey::Eurusd.quoted_in_account_currency());
        assert!(!SymbolKey::Usdjpy.quoted_in_account_currency());
        assert!(!SymbolKey::Xauusd.quoted_in_account_currency());
    }

    #[test]
    fn test_symbol_roundtrip() {
        for sym in SymbolKey::ALL {
            assert_eq!(sym.as_str().parse::<SymbolKey>().unwrap(), sym);
        }
        assert!("GBPUSD".parse::<SymbolKey>().is_err());
    }
}
