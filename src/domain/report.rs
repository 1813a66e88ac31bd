//! Per-message dispatch reports.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::{ParseFailure, SizingFailure};
use super::order::OrderResult;
use super::signal::Signal;

/// Pipeline stage a message stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Filter,
    Parse,
    Size,
    Execute,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Parse => "parse",
            Self::Size => "size",
            Self::Execute => "execute",
        }
    }
}

/// Terminal status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not a signal, or not a valid one.
    Skipped,
    /// Valid signal that could not be sized.
    Aborted,
    /// Order accepted by the exchange.
    Placed,
    /// Order rejected or lost in transport.
    Failed,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Aborted => "aborted",
            Self::Placed => "placed",
            Self::Failed => "failed",
        }
    }
}

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Text carries no signal marker.
    Ignored,
    /// Candidate text that is not a valid signal.
    ParseFailed(ParseFailure),
    /// Valid signal, no tradeable size.
    SizingAborted {
        signal: Signal,
        failure: SizingFailure,
    },
    /// An order was attempted.
    Executed {
        signal: Signal,
        quantity: Decimal,
        result: OrderResult,
    },
}

impl DispatchOutcome {
    /// Stage the message reached last.
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Ignored => Stage::Filter,
            Self::ParseFailed(_) => Stage::Parse,
            Self::SizingAborted { .. } => Stage::Size,
            Self::Executed { .. } => Stage::Execute,
        }
    }

    pub const fn status(&self) -> Status {
        match self {
            Self::Ignored | Self::ParseFailed(_) => Status::Skipped,
            Self::SizingAborted { .. } => Status::Aborted,
            Self::Executed { result, .. } if result.success => Status::Placed,
            Self::Executed { .. } => Status::Failed,
        }
    }
}

/// Report emitted once per inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Correlation id for log lines of this message.
    pub dispatch_id: Uuid,
    pub received_at: DateTime<Utc>,
    /// Wall time spent in the pipeline.
    pub elapsed: Duration,
    pub outcome: DispatchOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ExecutionFailure;
    use crate::domain::signal::Side;
    use rust_decimal_macros::dec;

    fn signal() -> Signal {
        Signal {
            signal_number: 3,
            category: "linear".to_string(),
            symbol: "ETHUSDT".to_string(),
            side: Side::Sell,
            order_type: "Market".to_string(),
            signal_qty: None,
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(DispatchOutcome::Ignored.stage(), Stage::Filter);
        assert_eq!(DispatchOutcome::Ignored.status(), Status::Skipped);

        let parse = DispatchOutcome::ParseFailed(ParseFailure::MissingSide);
        assert_eq!(parse.stage().as_str(), "parse");
        assert_eq!(parse.status().as_str(), "skipped");

        let aborted = DispatchOutcome::SizingAborted {
            signal: signal(),
            failure: SizingFailure::UnsupportedMode,
        };
        assert_eq!(aborted.status(), Status::Aborted);
        assert_eq!(aborted.stage(), Stage::Size);
    }

    #[test]
    fn test_executed_status_follows_result() {
        let placed = DispatchOutcome::Executed {
            signal: signal(),
            quantity: dec!(1),
            result: OrderResult::placed(Some("abc".to_string())),
        };
        assert_eq!(placed.status(), Status::Placed);

        let failed = DispatchOutcome::Executed {
            signal: signal(),
            quantity: dec!(1),
            result: OrderResult::failed(&ExecutionFailure::Transport("timeout".to_string())),
        };
        assert_eq!(failed.status(), Status::Failed);
        assert_eq!(failed.stage(), Stage::Execute);
    }
}
