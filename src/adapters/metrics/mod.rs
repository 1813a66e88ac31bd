//! Metrics and Monitoring Adapters
//!
//! Prometheus counters/histograms fed by dispatch reports, and an axum
//! 0.7 server exposing `/live`, `/ready` and `/metrics`.

pub mod health;
pub mod prometheus;

pub use health::{HealthServer, HealthState};
pub use prometheus::MetricsRegistry;
