//! Trade Executor - Single-attempt Order Submission
//!
//! Builds the order for a sized signal, submits it once through the
//! `OrderPort` and folds every possible outcome (accepted, rejected,
//! transport error) into an `OrderResult`. Nothing escapes as an error.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::domain::error::ExecutionFailure;
use crate::domain::order::{OrderRequest, OrderResult};
use crate::domain::signal::Signal;
use crate::ports::orders::OrderPort;

/// Submits sized signals to the exchange.
pub struct TradeExecutor<O: OrderPort + ?Sized> {
  /// Order submission port.
  orders: Arc<O>,
}

impl<O: OrderPort + ?Sized> TradeExecutor<O> {
  /// Create a new executor.
  pub const fn new(orders: Arc<O>) -> Self {
    Self { orders }
  }

  /// Place one order for `signal` sized at `quantity`.
  ///
  /// A non-positive quantity is refused without touching the port.
  #[instrument(
    skip(self, signal),
    fields(signal = signal.signal_number, symbol = %signal.symbol, side = %signal.side)
  )]
  pub async fn execute(&self, signal: &Signal, quantity: Decimal) -> OrderResult {
    if quantity <= Decimal::ZERO {
      warn!(%quantity, "Refusing order with invalid quantity");
      return OrderResult::failed(&ExecutionFailure::InvalidQuantity);
    }

    let request = OrderRequest::from_signal(signal, quantity);
    info!(
      category = %request.category,
      order_type = %request.order_type,
      qty = %request.quantity,
      "Submitting order"
    );

    let failure = match self.orders.place_order(&request).await {
      Ok(ack) if ack.is_success() => {
        info!(order_id = ?ack.order_id, "Order accepted");
        return OrderResult::placed(ack.order_id);
      }
      Ok(ack) => ExecutionFailure::Rejected {
        code: ack.ret_code,
        message: ack.ret_msg,
      },
      Err(e) => ExecutionFailure::Transport(format!("{e:#}")),
    };

    warn!(error = %failure, "Order not placed");
    OrderResult::failed(&failure)
  }
}
