//! Signal text parser.
//!
//! Channel messages are loosely formatted blocks such as:
//!
//! ```text
//! SIGNAL #7
//! Category: linear
//! Symbol: ETHUSDT
//! Side: Buy
//! OrderType: Market
//! Quantity: 0.04
//! ```
//!
//! Each field is described by a `FieldRule` (marker + value lexeme).
//! A marker may sit anywhere in the text, decorated lines like
//! `📈 Side: Buy` included; the first occurrence that is followed by a
//! non-empty value wins. Field order does not matter.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::ParseFailure;
use super::signal::{DEFAULT_CATEGORY, DEFAULT_ORDER_TYPE, Side, Signal};

/// Literal that makes a message a signal candidate.
pub const SIGNAL_MARKER: &str = "SIGNAL #";

/// Shape of the value that follows a field marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    /// Unicode alphanumerics and `_`, after optional whitespace.
    Word,
    /// ASCII digits immediately after the marker.
    Digits,
    /// ASCII digits and `.`, after optional whitespace.
    Decimal,
}

impl Lexeme {
    fn accepts(self, c: char) -> bool {
        match self {
            Self::Word => c.is_alphanumeric() || c == '_',
            Self::Digits => c.is_ascii_digit(),
            Self::Decimal => c.is_ascii_digit() || c == '.',
        }
    }

    const fn skips_whitespace(self) -> bool {
        !matches!(self, Self::Digits)
    }
}

/// A named field: where it starts and what its value looks like.
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    marker: &'static str,
    lexeme: Lexeme,
}

impl FieldRule {
    const fn new(marker: &'static str, lexeme: Lexeme) -> Self {
        Self { marker, lexeme }
    }

    /// Raw value of the first occurrence of this field carrying one.
    fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.match_indices(self.marker).find_map(|(at, _)| {
            let rest = &text[at + self.marker.len()..];
            let rest = if self.lexeme.skips_whitespace() {
                rest.trim_start()
            } else {
                rest
            };
            let end = rest
                .find(|c: char| !self.lexeme.accepts(c))
                .unwrap_or(rest.len());
            (end > 0).then(|| &rest[..end])
        })
    }
}

const SIGNAL_NUMBER: FieldRule = FieldRule::new(SIGNAL_MARKER, Lexeme::Digits);
const CATEGORY: FieldRule = FieldRule::new("Category:", Lexeme::Word);
const SYMBOL: FieldRule = FieldRule::new("Symbol:", Lexeme::Word);
const SIDE: FieldRule = FieldRule::new("Side:", Lexeme::Word);
const ORDER_TYPE: FieldRule = FieldRule::new("OrderType:", Lexeme::Word);
const QUANTITY: FieldRule = FieldRule::new("Quantity:", Lexeme::Decimal);

/// Stateless parser turning message text into a `Signal`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalParser;

impl SignalParser {
    /// Whether the text is worth parsing at all.
    pub fn is_candidate(text: &str) -> bool {
        text.contains(SIGNAL_MARKER)
    }

    /// Parse one message.
    ///
    /// Pure and total: the same text always yields the same signal or
    /// the same failure.
    ///
    /// # Errors
    /// Returns `ParseFailure` when `Symbol:` or `Side:` is missing, the
    /// side is not Buy/Sell, or a numeric field cannot be represented.
    pub fn parse(text: &str) -> Result<Signal, ParseFailure> {
        let signal_number = match SIGNAL_NUMBER.find(text) {
            Some(digits) => digits
                .parse::<u64>()
                .map_err(|_| ParseFailure::InvalidSignalNumber(digits.to_owned()))?,
            None => 0,
        };

        let signal_qty = QUANTITY
            .find(text)
            .map(|raw| {
                Decimal::from_str(raw).map_err(|_| ParseFailure::InvalidQuantity(raw.to_owned()))
            })
            .transpose()?;

        let symbol = SYMBOL.find(text).ok_or(ParseFailure::MissingSymbol)?;
        let side_raw = SIDE.find(text).ok_or(ParseFailure::MissingSide)?;
        let side = side_raw
            .parse::<Side>()
            .map_err(|()| ParseFailure::InvalidSide(side_raw.to_owned()))?;

        Ok(Signal {
            signal_number,
            category: CATEGORY.find(text).unwrap_or(DEFAULT_CATEGORY).to_owned(),
            symbol: symbol.to_owned(),
            side,
            order_type: ORDER_TYPE.find(text).unwrap_or(DEFAULT_ORDER_TYPE).to_owned(),
            signal_qty,
        })
    }
}
