//! Bybit Market Data - Wallet Balance and Last Price
//!
//! Implements `MarketDataPort` on the v5 wallet-balance and tickers
//! endpoints. Every failure is logged and reported as zero.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::client::BybitClient;
use super::types::{ApiResponse, TickersResult, WalletBalanceResult};
use crate::config::ExchangeConfig;
use crate::ports::market_data::MarketDataPort;

const WALLET_BALANCE_PATH: &str = "/v5/account/wallet-balance";
const TICKERS_PATH: &str = "/v5/market/tickers";

/// Balance and price reads against Bybit.
pub struct BybitMarketData {
    /// Shared signed client.
    client: Arc<BybitClient>,
    /// Wallet account type, e.g. `UNIFIED`.
    account_type: String,
    /// Ticker category used for prices, e.g. `spot`.
    price_category: String,
}

impl BybitMarketData {
    /// Create a market data adapter over `client`.
    pub fn new(client: Arc<BybitClient>, exchange: &ExchangeConfig) -> Self {
        Self {
            client,
            account_type: exchange.account_type.clone(),
            price_category: exchange.price_category.clone(),
        }
    }

    async fn fetch_balance(&self, asset: &str) -> Result<Decimal> {
        let response: ApiResponse<WalletBalanceResult> = self
            .client
            .get(
                WALLET_BALANCE_PATH,
                &[("accountType", self.account_type.as_str()), ("coin", asset)],
            )
            .await?;
        let result = response.into_result()?;
        let raw = result
            .wallet_balance(asset)
            .with_context(|| format!("No {asset} entry in wallet"))?;
        parse_amount(raw)
    }

    async fn fetch_last_price(&self, symbol: &str) -> Result<Decimal> {
        let response: ApiResponse<TickersResult> = self
            .client
            .get(
                TICKERS_PATH,
                &[("category", self.price_category.as_str()), ("symbol", symbol)],
            )
            .await?;
        let result = response.into_result()?;
        let raw = result
            .last_price(symbol)
            .with_context(|| format!("No ticker for {symbol}"))?;
        parse_amount(raw)
    }
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).with_context(|| format!("Invalid decimal {raw:?}"))
}

#[async_trait]
impl MarketDataPort for BybitMarketData {
    #[instrument(skip(self))]
    async fn get_balance(&self, asset: &str) -> Decimal {
        match self.fetch_balance(asset).await {
            Ok(balance) => {
                debug!(%balance, "Wallet balance");
                balance
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Balance unavailable, using 0");
                Decimal::ZERO
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_last_price(&self, symbol: &str) -> Decimal {
        match self.fetch_last_price(symbol).await {
            Ok(price) => {
                debug!(%price, "Last price");
                price
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Price unavailable, using 0");
                Decimal::ZERO
            }
        }
    }
}
