//! Per-stage failure taxonomy.
//!
//! None of these are fatal: the dispatcher turns each into a terminal
//! outcome for the message that produced it and moves on.

use rust_decimal::Decimal;
use thiserror::Error;

use super::sizing::TradingMode;

/// The message could not be turned into a `Signal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("missing Symbol: field")]
    MissingSymbol,
    #[error("missing Side: field")]
    MissingSide,
    #[error("unknown side {0:?}, expected Buy or Sell")]
    InvalidSide(String),
    #[error("malformed quantity {0:?}")]
    InvalidQuantity(String),
    #[error("signal number {0:?} out of range")]
    InvalidSignalNumber(String),
}

/// The configured mode could not produce a tradeable size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingFailure {
    #[error("{mode} sizing produced non-positive quantity {quantity}")]
    NonPositive { mode: TradingMode, quantity: Decimal },
    #[error("trading mode is not supported, signal skipped")]
    UnsupportedMode,
}

/// The order was not placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionFailure {
    #[error("invalid quantity")]
    InvalidQuantity,
    /// Exchange answered with a non-zero return code; the message is `retMsg`.
    #[error("{message}")]
    Rejected { code: i64, message: String },
    #[error("{0}")]
    Transport(String),
}
