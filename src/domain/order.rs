//! Order request/result types exchanged with the order port.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ExecutionFailure;
use super::signal::{Side, Signal};

/// Order as submitted to the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub category: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: String,
    /// Decimal string, never a float, e.g. `"0.04"`.
    pub quantity: String,
}

impl OrderRequest {
    /// Build the request for `signal` sized at `quantity`.
    pub fn from_signal(signal: &Signal, quantity: Decimal) -> Self {
        Self {
            category: signal.category.clone(),
            symbol: signal.symbol.clone(),
            side: signal.side,
            order_type: signal.order_type.clone(),
            quantity: format_quantity(quantity),
        }
    }
}

/// Render a quantity for the wire without trailing zeros.
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

/// Interpreted outcome of one order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderResult {
    pub success: bool,
    pub order_id: Option<String>,
    pub error_message: Option<String>,
}

impl OrderResult {
    /// Accepted order.
    pub const fn placed(order_id: Option<String>) -> Self {
        Self {
            success: true,
            order_id,
            error_message: None,
        }
    }

    /// Order not placed.
    pub fn failed(failure: &ExecutionFailure) -> Self {
        Self {
            success: false,
            order_id: None,
            error_message: Some(failure.to_string()),
        }
    }
}
