//! Market Data Port - Balance and Price Reads
//!
//! Sizing reads the wallet and the last traded price on demand, once
//! per computation. Nothing is cached behind this port.

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for market data providers.
///
/// Implementations MUST NOT fail: an unreachable exchange, a timeout
/// or a malformed response is reported as `Decimal::ZERO`, which the
/// quantity calculator treats as "cannot size".
#[async_trait]
pub trait MarketDataPort: Send + Sync + 'static {
  /// Wallet balance of `asset` (e.g. `USDT`, `ETH`).
  async fn get_balance(&self, asset: &str) -> Decimal;

  /// Last traded price of `symbol` (e.g. `ETHUSDT`).
  async fn get_last_price(&self, symbol: &str) -> Decimal;
}
