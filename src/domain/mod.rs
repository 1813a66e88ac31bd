//! Domain layer - Signals, sizing policy and order types.
//!
//! Pure logic only (hexagonal architecture inner ring): no I/O and no
//! dependency on ports or adapters. Everything here is testable in
//! isolation.

pub mod error;
pub mod order;
pub mod parser;
pub mod report;
pub mod signal;
pub mod sizing;

// Re-export core types for convenience
pub use error::{ExecutionFailure, ParseFailure, SizingFailure};
pub use order::{OrderRequest, OrderResult};
pub use parser::SignalParser;
pub use report::{DispatchOutcome, DispatchReport, Stage, Status};
pub use signal::{Side, Signal};
pub use sizing::{MarketSnapshot, TradingMode, TradingModeConfig};
