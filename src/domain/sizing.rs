//! Position sizing policy and arithmetic.
//!
//! Three policies decide how much to trade for a signal:
//! - `MIRROR`: copy the quantity announced in the signal
//! - `FIXED`: spend a fixed quote amount on buys, sell a fixed base amount
//! - `ALL_IN`: commit a fraction of the current wallet balance
//!
//! Everything here is pure; balance and price reads happen in
//! `usecases::quantity_calculator`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Capital allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingMode {
    /// Use the signal's own quantity.
    Mirror,
    /// Fixed quote spend per buy, fixed base amount per sell.
    Fixed,
    /// Fraction of the current balance.
    AllIn,
    /// Any unrecognised mode name. Sizes every signal at 0.
    #[serde(other)]
    Unsupported,
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mirror => "MIRROR",
            Self::Fixed => "FIXED",
            Self::AllIn => "ALL_IN",
            Self::Unsupported => "UNSUPPORTED",
        })
    }
}

impl FromStr for TradingMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "MIRROR" => Self::Mirror,
            "FIXED" => Self::Fixed,
            "ALL_IN" => Self::AllIn,
            _ => Self::Unsupported,
        })
    }
}

/// Sizing configuration. Loaded once at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TradingModeConfig {
    /// Active sizing policy.
    #[serde(default = "default_mode")]
    pub mode: TradingMode,
    /// Quote amount spent per FIXED buy.
    #[serde(default = "default_fixed_usdt")]
    pub fixed_usdt: Decimal,
    /// Base amount sold per FIXED sell.
    #[serde(default = "default_fixed_base_qty")]
    pub fixed_base_qty: Decimal,
    /// Share of the balance committed in ALL_IN, in (0, 1].
    #[serde(default = "default_all_in_fraction")]
    pub all_in_fraction: Decimal,
    /// Funding asset of the traded pairs.
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    /// Decimal places derived quantities are truncated to.
    #[serde(default = "default_qty_precision")]
    pub qty_precision: u32,
}

impl Default for TradingModeConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            fixed_usdt: default_fixed_usdt(),
            fixed_base_qty: default_fixed_base_qty(),
            all_in_fraction: default_all_in_fraction(),
            quote_asset: default_quote_asset(),
            qty_precision: default_qty_precision(),
        }
    }
}

const fn default_mode() -> TradingMode {
    TradingMode::Mirror
}

fn default_fixed_usdt() -> Decimal {
    dec!(100)
}

fn default_fixed_base_qty() -> Decimal {
    dec!(0.04)
}

fn default_all_in_fraction() -> Decimal {
    dec!(0.95)
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

const fn default_qty_precision() -> u32 {
    6
}

/// Market state observed while sizing one signal.
///
/// Only the fields a policy actually reads are populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketSnapshot {
    pub quote_balance: Option<Decimal>,
    pub base_balance: Option<Decimal>,
    pub last_price: Option<Decimal>,
}

/// Base amount bought with `quote_amount` at `price`.
///
/// Returns 0 when the price is unavailable (≤ 0) or the division
/// overflows.
pub fn quote_to_base(quote_amount: Decimal, price: Decimal, precision: u32) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    quote_amount
        .checked_div(price)
        .map_or(Decimal::ZERO, |qty| truncate(qty, precision))
}

/// `amount × fraction`, truncated. Overflow yields 0.
pub fn fraction_of(amount: Decimal, fraction: Decimal, precision: u32) -> Decimal {
    amount
        .checked_mul(fraction)
        .map_or(Decimal::ZERO, |qty| truncate(qty, precision))
}

/// Base asset of a pair quoted in `quote_asset` (`ETHUSDT` → `ETH`).
pub fn base_asset<'a>(symbol: &'a str, quote_asset: &str) -> &'a str {
    symbol
        .strip_suffix(quote_asset)
        .filter(|base| !base.is_empty())
        .unwrap_or(symbol)
}

fn truncate(value: Decimal, precision: u32) -> Decimal {
    value
        .round_dp_with_strategy(precision, RoundingStrategy::ToZero)
        .normalize()
}
