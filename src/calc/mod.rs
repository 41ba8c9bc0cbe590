//! Position sizing and trade planning engine.
//!
//! Pure, synchronous functions over immutable input snapshots: validation,
//! instrument valuation, risk-to-lot-size conversion, and SL/TP derivation.
//! The engine holds no state; callers own the inputs and results.

mod error;
mod planner;
mod sizing;
mod symbol;
mod validate;
mod valuation;

pub use error::CalcError;
pub use planner::{compute_trade_plan, Direction, PlanInput, PlanResult};
pub use sizing::{compute_position_size, floor_to_step, SizingInput, SizingResult};
pub use symbol::{Currency, InstrumentClass, SymbolKey, ACCOUNT_CURRENCY, FX_LOT_SIZE};
pub use validate::validate;
