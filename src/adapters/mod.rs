//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `bybit`: Bybit v5 REST client, market data and order placement
//! - `dry_run`: local order acknowledgement for paper runs
//! - `metrics`: Prometheus metrics export and health checks
//! - `telegram`: Telegram channel listener

pub mod bybit;
pub mod dry_run;
pub mod metrics;
pub mod telegram;
