//! Error kinds for the calculation engine.
//!
//! Both variants are deterministic and local to a single call. Messages are
//! written for the end user, who is expected to correct the input (or loosen
//! the risk/lot-step configuration) and resubmit.

use thiserror::Error;

/// Error from a sizing or planning calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Malformed or out-of-domain input. Not retryable as-is.
    #[error("{0}")]
    Validation(String),

    /// Input was valid but the risk budget rounds down to zero lots.
    #[error("lot size rounded down to 0: the risk budget is too small for this stop distance and lot step")]
    ZeroLot,
}

impl CalcError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        CalcError::Validation(msg.into())
    }
}
