//! Bybit Order Adapter - Order Creation
//!
//! Implements `OrderPort` on `POST /v5/order/create`. The envelope's
//! `retCode`/`retMsg` are handed back untouched; only transport and
//! decoding problems become errors.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::client::BybitClient;
use super::types::{ApiResponse, CreateOrderBody, CreateOrderResult};
use crate::domain::order::OrderRequest;
use crate::ports::orders::{OrderAck, OrderPort};

const CREATE_ORDER_PATH: &str = "/v5/order/create";

/// Live order submission against Bybit.
pub struct BybitOrders {
    /// Shared signed client.
    client: Arc<BybitClient>,
}

impl BybitOrders {
    /// Create an order adapter over `client`.
    pub const fn new(client: Arc<BybitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderPort for BybitOrders {
    #[instrument(skip(self, request), fields(symbol = %request.symbol, side = %request.side))]
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderAck> {
        let body = CreateOrderBody::from(request);
        let response: ApiResponse<CreateOrderResult> =
            self.client.post(CREATE_ORDER_PATH, &body).await?;
        debug!(ret_code = response.ret_code, ret_msg = %response.ret_msg, "Order create reply");

        let order_id = response
            .result
            .and_then(|r| r.order_id)
            .filter(|id| !id.is_empty());

        Ok(OrderAck {
            ret_code: response.ret_code,
            ret_msg: response.ret_msg,
            order_id,
        })
    }
}
