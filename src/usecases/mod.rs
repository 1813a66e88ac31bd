//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! relay's per-message pipeline.
//!
//! Use cases:
//! - `QuantityCalculator`: Mode-driven position sizing
//! - `TradeExecutor`: Single-attempt order submission
//! - `SignalDispatcher`: Filter → parse → size → execute → report

pub mod quantity_calculator;
pub mod signal_dispatcher;
pub mod trade_executor;

pub use quantity_calculator::{QuantityCalculator, Sizing};
pub use signal_dispatcher::SignalDispatcher;
pub use trade_executor::TradeExecutor;
