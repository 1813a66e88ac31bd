//! Bybit v5 Request/Response Types
//!
//! Every v5 endpoint answers with the same envelope
//! `{retCode, retMsg, result}`. On errors `result` is often `{}`, so all
//! payload fields carry serde defaults.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::order::OrderRequest;

/// Common v5 response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// 0 on success, Bybit error code otherwise.
    pub ret_code: i64,
    /// Human-readable status ("OK" on success).
    #[serde(default)]
    pub ret_msg: String,
    /// Endpoint payload.
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether Bybit accepted the request.
    pub const fn is_ok(&self) -> bool {
        self.ret_code == 0
    }

    /// Payload of a successful response, error otherwise.
    pub fn into_result(self) -> Result<T> {
        if !self.is_ok() {
            bail!("Bybit error {}: {}", self.ret_code, self.ret_msg);
        }
        match self.result {
            Some(result) => Ok(result),
            None => bail!("Bybit response carried no result"),
        }
    }
}

/// Body of `POST /v5/order/create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub category: String,
    pub symbol: String,
    /// "Buy" or "Sell".
    pub side: String,
    /// "Market" or "Limit".
    pub order_type: String,
    /// Quantity as a decimal string.
    pub qty: String,
}

impl From<&OrderRequest> for CreateOrderBody {
    fn from(request: &OrderRequest) -> Self {
        Self {
            category: request.category.clone(),
            symbol: request.symbol.clone(),
            side: request.side.as_str().to_string(),
            order_type: request.order_type.clone(),
            qty: request.quantity.clone(),
        }
    }
}

/// `result` of `POST /v5/order/create`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResult {
    /// Exchange-assigned order id.
    #[serde(default)]
    pub order_id: Option<String>,
}

/// `result` of `GET /v5/account/wallet-balance`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletBalanceResult {
    #[serde(default)]
    pub list: Vec<WalletAccount>,
}

impl WalletBalanceResult {
    /// Wallet balance string for `asset` in the first account.
    pub fn wallet_balance(&self, asset: &str) -> Option<&str> {
        self.list
            .first()?
            .coin
            .iter()
            .find(|c| c.coin.eq_ignore_ascii_case(asset))
            .map(|c| c.wallet_balance.as_str())
    }
}

/// One account inside a wallet-balance response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    #[serde(default)]
    pub coin: Vec<CoinBalance>,
}

/// Per-coin balance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub coin: String,
    /// Decimal string, may be empty.
    #[serde(default)]
    pub wallet_balance: String,
}

/// `result` of `GET /v5/market/tickers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickersResult {
    #[serde(default)]
    pub list: Vec<Ticker>,
}

impl TickersResult {
    /// Last traded price string of `symbol`.
    pub fn last_price(&self, symbol: &str) -> Option<&str> {
        self.list
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
            .map(|t| t.last_price.as_str())
    }
}

/// One ticker row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    #[serde(default)]
    pub last_price: String,
}
