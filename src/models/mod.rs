//! Data models for the trade journal.

mod trade;

pub use trade::{Journal, TradeInputs, TradeOutputs, TradeRecord, TradeStatus};
