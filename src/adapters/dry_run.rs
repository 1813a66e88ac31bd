//! Dry-run Order Adapter
//!
//! Acknowledges every order locally so the whole pipeline can run
//! against live signals and live market data without trading.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::order::OrderRequest;
use crate::ports::orders::{OrderAck, OrderPort};

/// `OrderPort` that never reaches the exchange.
#[derive(Debug, Default)]
pub struct DryRunOrders {
    /// Orders acknowledged so far.
    accepted: AtomicU64,
}

impl DryRunOrders {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderPort for DryRunOrders {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderAck> {
        let order_id = format!("dry-{}", Uuid::new_v4());
        let accepted = self.accepted.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            order_id = %order_id,
            accepted,
            category = %request.category,
            symbol = %request.symbol,
            side = %request.side,
            order_type = %request.order_type,
            qty = %request.quantity,
            "DRY RUN: order not sent"
        );
        Ok(OrderAck {
            ret_code: 0,
            ret_msg: "OK".to_string(),
            order_id: Some(order_id),
        })
    }
}
