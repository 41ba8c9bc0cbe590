//! Journal record for a planned trade.
//!
//! Groups the raw calculation inputs, the computed outputs, and the journal
//! lifecycle fields the way the persistence layer stores them. The engine
//! only ever produces the outputs half; the record is assembled here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calc::{
    Direction, PlanInput, PlanResult, SizingInput, SizingResult, SymbolKey,
};

/// Lifecycle status of a journaled trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Planned,
    Open,
    Closed,
    Cancelled,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Planned => "PLANNED",
            TradeStatus::Open => "OPEN",
            TradeStatus::Closed => "CLOSED",
            TradeStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLANNED" => Some(TradeStatus::Planned),
            "OPEN" => Some(TradeStatus::Open),
            "CLOSED" => Some(TradeStatus::Closed),
            "CANCELLED" => Some(TradeStatus::Cancelled),
            _ => None,
        }
    }
}

/// Raw sizing/plan parameters as entered, including broker overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInputs {
    pub balance_chf: Decimal,
    pub risk_pct: Decimal,
    pub stop_distance: Decimal,
    /// "PIPS" or "TICKS", depending on the instrument.
    pub stop_unit: String,
    pub lot_step: Decimal,
    pub usdchf_rate: Decimal,
    /// Gold only.
    pub tick_size: Option<Decimal>,
    /// Gold only.
    pub contract_size: Option<Decimal>,
}

/// Computed prices, lot size, and risk/reward in CHF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOutputs {
    pub sl_price: Decimal,
    pub tp_price: Decimal,
    pub risk_distance_price: Decimal,
    pub reward_distance_price: Decimal,
    pub value_per_unit_per_lot_chf: Decimal,
    pub stop_value_per_lot_chf: Decimal,
    pub lots: Decimal,
    pub exposure_units: Decimal,
    pub risk_chf: Decimal,
    pub reward_chf: Decimal,
    pub reward_to_risk: Decimal,
}

/// Free-text note plus lifecycle tracking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    pub note: Option<String>,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub realized_pnl_chf: Option<Decimal>,
    pub realized_r_multiple: Option<Decimal>,
}

/// A saved trade plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub symbol: SymbolKey,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
    pub inputs: TradeInputs,
    pub outputs: TradeOutputs,
    pub journal: Journal,
}

impl TradeRecord {
    /// Merge one sizing result and one plan (computed from the same input
    /// snapshot) into a persistable `Planned` record.
    pub fn from_calc(
        sizing_input: &SizingInput,
        plan_input: &PlanInput,
        sizing: &SizingResult,
        plan: &PlanResult,
        note: Option<String>,
    ) -> Self {
        let is_metal = sizing_input.symbol == SymbolKey::Xauusd;

        Self {
            id: Uuid::new_v4().to_string(),
            symbol: sizing_input.symbol,
            direction: plan_input.direction,
            entry_price: plan_input.entry_price,
            status: TradeStatus::Planned,
            created_at: Utc::now(),
            inputs: TradeInputs {
                balance_chf: sizing_input.balance,
                risk_pct: sizing_input.risk_pct,
                stop_distance: sizing_input.stop_distance,
                stop_unit: sizing.distance_label.to_uppercase(),
                lot_step: sizing_input.lot_step,
                usdchf_rate: sizing_input.conversion_rate,
                tick_size: is_metal.then_some(sizing_input.tick_size),
                contract_size: is_metal.then_some(sizing_input.contract_size),
            },
            outputs: TradeOutputs {
                sl_price: plan.sl_price,
                tp_price: plan.tp_price,
                risk_distance_price: plan.risk_distance_price,
                reward_distance_price: plan.reward_distance_price,
                value_per_unit_per_lot_chf: sizing.value_per_unit_per_lot,
                stop_value_per_lot_chf: sizing.stop_value_per_lot,
                lots: sizing.lots,
                exposure_units: sizing.exposure_units,
                risk_chf: sizing.risk_money,
                reward_chf: sizing.risk_money * plan_input.reward_to_risk,
                reward_to_risk: plan_input.reward_to_risk,
            },
            journal: Journal {
                note,
                ..Journal::default()
            },
        }
    }

    /// Realized R-multiple for a given P&L against the planned risk.
    pub fn r_multiple_for(&self, realized_pnl_chf: Decimal) -> Option<Decimal> {
        if self.outputs.risk_chf.is_zero() {
            return None;
        }
        Some(realized_pnl_chf / self.outputs.risk_chf)
    }
}
