//! Quantity Calculator - Mode-driven Position Sizing
//!
//! Turns a signal into a trade size according to the configured
//! `TradingMode`:
//!
//! | Mode   | Buy                                   | Sell                          |
//! |--------|---------------------------------------|-------------------------------|
//! | MIRROR | signal quantity (absent ⇒ 0)          | same                          |
//! | FIXED  | fixed_usdt / last price               | fixed_base_qty                |
//! | ALL_IN | quote balance × fraction / last price | base balance × fraction       |
//!
//! Balances and prices are read fresh on every computation. A zero
//! result is the "cannot size" sentinel; this stage never fails.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::domain::signal::{Side, Signal};
use crate::domain::sizing::{
  base_asset, fraction_of, quote_to_base, MarketSnapshot, TradingMode, TradingModeConfig,
};
use crate::ports::market_data::MarketDataPort;

/// Size chosen for a signal plus the market state it was based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizing {
  /// Trade size in base units; ≤ 0 means "do not trade".
  pub quantity: Decimal,
  /// Reads performed while sizing.
  pub snapshot: MarketSnapshot,
}

/// Sizes signals against live market data.
pub struct QuantityCalculator<M: MarketDataPort + ?Sized> {
  /// Sizing policy.
  config: TradingModeConfig,
  /// Balance/price source.
  market: Arc<M>,
}

impl<M: MarketDataPort + ?Sized> QuantityCalculator<M> {
  /// Create a new calculator.
  pub const fn new(config: TradingModeConfig, market: Arc<M>) -> Self {
    Self { config, market }
  }

  /// Active sizing configuration.
  pub const fn config(&self) -> &TradingModeConfig {
    &self.config
  }

  /// Trade size for `signal`, 0 when it cannot be sized.
  pub async fn compute(&self, signal: &Signal) -> Decimal {
    self.size(signal).await.quantity
  }

  /// Trade size for `signal` together with the reads it used.
  #[instrument(
    skip(self, signal),
    fields(mode = %self.config.mode, symbol = %signal.symbol, side = %signal.side)
  )]
  pub async fn size(&self, signal: &Signal) -> Sizing {
    let config = &self.config;
    let precision = config.qty_precision;
    let mut snapshot = MarketSnapshot::default();

    let quantity = match (config.mode, signal.side) {
      (TradingMode::Mirror, _) => signal.signal_qty.unwrap_or(Decimal::ZERO),

      (TradingMode::Fixed, Side::Buy) => {
        let price = self.market.get_last_price(&signal.symbol).await;
        snapshot.last_price = Some(price);
        quote_to_base(config.fixed_usdt, price, precision)
      }

      (TradingMode::Fixed, Side::Sell) => config.fixed_base_qty,

      (TradingMode::AllIn, Side::Buy) => {
        let balance = self.market.get_balance(&config.quote_asset).await;
        snapshot.quote_balance = Some(balance);
        let spend = balance
          .checked_mul(config.all_in_fraction)
          .unwrap_or(Decimal::ZERO);

        let price = self.market.get_last_price(&signal.symbol).await;
        snapshot.last_price = Some(price);
        quote_to_base(spend, price, precision)
      }

      (TradingMode::AllIn, Side::Sell) => {
        let asset = base_asset(&signal.symbol, &config.quote_asset);
        let balance = self.market.get_balance(asset).await;
        snapshot.base_balance = Some(balance);
        fraction_of(balance, config.all_in_fraction, precision)
      }

      (TradingMode::Unsupported, _) => Decimal::ZERO,
    };

    debug!(
      %quantity,
      quote_balance = ?snapshot.quote_balance,
      base_balance = ?snapshot.base_balance,
      last_price = ?snapshot.last_price,
      "Quantity computed"
    );

    Sizing { quantity, snapshot }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use async_trait::async_trait;
  use rust_decimal_macros::dec;

  use super::*;

  /// Fixed market state that counts reads.
  struct StubMarket {
    quote_balance: Decimal,
    base_balance: Decimal,
    price: Decimal,
    balance_reads: AtomicUsize,
    price_reads: AtomicUsize,
  }

  impl StubMarket {
    fn new(quote_balance: Decimal, base_balance: Decimal, price: Decimal) -> Arc<Self> {
      Arc::new(Self {
        quote_balance,
        base_balance,
        price,
        balance_reads: AtomicUsize::new(0),
        price_reads: AtomicUsize::new(0),
      })
    }
  }

  #[async_trait]
  impl MarketDataPort for StubMarket {
    async fn get_balance(&self, asset: &str) -> Decimal {
      self.balance_reads.fetch_add(1, Ordering::SeqCst);
      if asset == "USDT" {
        self.quote_balance
      } else {
        self.base_balance
      }
    }

    async fn get_last_price(&self, _symbol: &str) -> Decimal {
      self.price_reads.fetch_add(1, Ordering::SeqCst);
      self.price
    }
  }

  fn config(mode: TradingMode) -> TradingModeConfig {
    TradingModeConfig {
      mode,
      fixed_usdt: dec!(100),
      fixed_base_qty: dec!(0.04),
      all_in_fraction: dec!(0.95),
      ..TradingModeConfig::default()
    }
  }

  fn signal(side: Side, qty: Option<Decimal>) -> Signal {
    Signal {
      signal_number: 1,
      category: "linear".to_string(),
      symbol: "ETHUSDT".to_string(),
      side,
      order_type: "Market".to_string(),
      signal_qty: qty,
    }
  }

  #[tokio::test]
  async fn test_mirror_uses_signal_quantity() {
    let market = StubMarket::new(dec!(1000), dec!(2), dec!(2000));
    let calc = QuantityCalculator::new(config(TradingMode::Mirror), Arc::clone(&market));

    assert_eq!(calc.compute(&signal(Side::Buy, Some(dec!(0.04)))).await, dec!(0.04));
    assert_eq!(calc.compute(&signal(Side::Sell, Some(dec!(3)))).await, dec!(3));
    assert_eq!(calc.compute(&signal(Side::Buy, None)).await, Decimal::ZERO);

    assert_eq!(market.balance_reads.load(Ordering::SeqCst), 0);
    assert_eq!(market.price_reads.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_fixed_buy_divides_by_price() {
    let market = StubMarket::new(dec!(0), dec!(0), dec!(2000));
    let calc = QuantityCalculator::new(config(TradingMode::Fixed), Arc::clone(&market));

    assert_eq!(calc.compute(&signal(Side::Buy, None)).await, dec!(0.05));
    assert_eq!(market.price_reads.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_fixed_sell_is_configured_amount() {
    let market = StubMarket::new(dec!(0), dec!(0), dec!(0));
    let calc = QuantityCalculator::new(config(TradingMode::Fixed), Arc::clone(&market));

    assert_eq!(calc.compute(&signal(Side::Sell, Some(dec!(9)))).await, dec!(0.04));
    assert_eq!(market.price_reads.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_all_in_buy() {
    let market = StubMarket::new(dec!(1000), dec!(0), dec!(2000));
    let calc = QuantityCalculator::new(config(TradingMode::AllIn), Arc::clone(&market));

    let sizing = calc.size(&signal(Side::Buy, None)).await;
    assert_eq!(sizing.quantity, dec!(0.475));
    assert_eq!(sizing.snapshot.quote_balance, Some(dec!(1000)));
    assert_eq!(sizing.snapshot.last_price, Some(dec!(2000)));
    assert_eq!(sizing.snapshot.base_balance, None);
  }

  #[tokio::test]
  async fn test_all_in_sell_uses_base_balance() {
    let market = StubMarket::new(dec!(1000), dec!(2.0), dec!(2000));
    let calc = QuantityCalculator::new(config(TradingMode::AllIn), Arc::clone(&market));

    assert_eq!(calc.compute(&signal(Side::Sell, None)).await, dec!(1.9));
    assert_eq!(market.price_reads.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_missing_price_sizes_buys_at_zero() {
    let market = StubMarket::new(dec!(1000), dec!(2), Decimal::ZERO);

    for mode in [TradingMode::Fixed, TradingMode::AllIn] {
      let calc = QuantityCalculator::new(config(mode), Arc::clone(&market));
      assert_eq!(calc.compute(&signal(Side::Buy, None)).await, Decimal::ZERO);
    }
  }

  #[tokio::test]
  async fn test_every_computation_reads_fresh() {
    let market = StubMarket::new(dec!(1000), dec!(2), dec!(2000));
    let calc = QuantityCalculator::new(config(TradingMode::AllIn), Arc::clone(&market));

    calc.compute(&signal(Side::Buy, None)).await;
    calc.compute(&signal(Side::Buy, None)).await;
    calc.compute(&signal(Side::Sell, None)).await;

    assert_eq!(market.balance_reads.load(Ordering::SeqCst), 3);
    assert_eq!(market.price_reads.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_unsupported_mode_sizes_zero() {
    let market = StubMarket::new(dec!(1000), dec!(2), dec!(2000));
    let calc = QuantityCalculator::new(config(TradingMode::Unsupported), market);

    assert_eq!(calc.compute(&signal(Side::Buy, Some(dec!(1)))).await, Decimal::ZERO);
  }

  #[tokio::test]
  async fn test_derived_quantity_is_truncated() {
    let market = StubMarket::new(dec!(0), dec!(0), dec!(3));
    let calc = QuantityCalculator::new(config(TradingMode::Fixed), market);

    // 100 / 3 truncated to 6 places
    assert_eq!(calc.compute(&signal(Side::Buy, None)).await, dec!(33.333333));
  }
}
