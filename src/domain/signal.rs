//! Trade signal types.
//!
//! A `Signal` is the structured form of one channel message. It is
//! produced by the parser, read by the sizing and execution stages,
//! and dropped once the message has been reported.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default exchange product category when a message omits `Category:`.
pub const DEFAULT_CATEGORY: &str = "linear";

/// Default order type when a message omits `OrderType:`.
pub const DEFAULT_ORDER_TYPE: &str = "Market";

/// Order side, rendered with the exchange's canonical casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire representation expected by the exchange.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ();

    /// Accepts `Buy`/`Sell` in any casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(Self::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(Self::Sell)
        } else {
            Err(())
        }
    }
}

/// Structured trade instruction extracted from one channel message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Sequence number announced by the channel (`SIGNAL #n`), 0 if absent.
    pub signal_number: u64,
    /// Exchange product category (`linear`, `spot`, ...).
    pub category: String,
    /// Trading pair, e.g. `ETHUSDT`.
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Exchange order type, `Market` unless the message says otherwise.
    pub order_type: String,
    /// Quantity announced by the channel, used verbatim in MIRROR mode.
    pub signal_qty: Option<Decimal>,
}
