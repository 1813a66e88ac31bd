//! Order Port - Exchange Order Submission
//!
//! A single attempt per call. The port never retries: market orders
//! carry no idempotency key, so a blind resend could double a trade.

use async_trait::async_trait;

use crate::domain::order::OrderRequest;

/// Raw exchange acknowledgement of an order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
  /// Exchange status code, 0 on success.
  pub ret_code: i64,
  /// Exchange status message.
  pub ret_msg: String,
  /// Assigned order id when the order was accepted.
  pub order_id: Option<String>,
}

impl OrderAck {
  /// Whether the exchange accepted the order.
  pub const fn is_success(&self) -> bool {
    self.ret_code == 0
  }
}

/// Trait for order submission providers.
#[async_trait]
pub trait OrderPort: Send + Sync + 'static {
  /// Submit one order.
  ///
  /// # Errors
  /// Returns error on transport or protocol failure (unreachable host,
  /// timeout, non-JSON reply). Exchange-level rejections are NOT
  /// errors: they come back as an `OrderAck` with a non-zero code.
  async fn place_order(&self, request: &OrderRequest) -> anyhow::Result<OrderAck>;
}
