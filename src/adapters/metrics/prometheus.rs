//! Prometheus Metrics Registry - Relay Observability
//!
//! Turns dispatch reports into Prometheus series. All metrics follow the
//! naming convention `signal_relay_*`.

use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use rust_decimal::prelude::ToPrimitive;

use crate::domain::report::{DispatchOutcome, DispatchReport};
use crate::ports::observer::DispatchObserver;

/// Centralized Prometheus metrics for the relay.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Inbound messages seen.
    pub messages_total: IntCounter,
    /// Terminal outcomes by stage and status.
    pub outcomes_total: IntCounterVec,
    /// Time from receipt to outcome, by final stage.
    pub pipeline_seconds: HistogramVec,
    /// Last attempted order quantity, by side.
    pub order_quantity: GaugeVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let messages_total = IntCounter::new(
            "signal_relay_messages_total",
            "Channel messages received by the dispatcher",
        )?;

        let outcomes_total = IntCounterVec::new(
            Opts::new(
                "signal_relay_outcomes_total",
                "Dispatch outcomes by final stage and status",
            ),
            &["stage", "status"],
        )?;

        let pipeline_seconds = HistogramVec::new(
            HistogramOpts::new(
                "signal_relay_pipeline_seconds",
                "Time spent dispatching one message",
            )
            .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["stage"],
        )?;

        let order_quantity = GaugeVec::new(
            Opts::new(
                "signal_relay_order_quantity",
                "Quantity of the last attempted order",
            ),
            &["side"],
        )?;

        registry.register(Box::new(messages_total.clone()))?;
        registry.register(Box::new(outcomes_total.clone()))?;
        registry.register(Box::new(pipeline_seconds.clone()))?;
        registry.register(Box::new(order_quantity.clone()))?;

        Ok(Self {
            registry,
            messages_total,
            outcomes_total,
            pipeline_seconds,
            order_quantity,
        })
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl DispatchObserver for MetricsRegistry {
    fn observe(&self, report: &DispatchReport) {
        let stage = report.outcome.stage().as_str();
        self.messages_total.inc();
        self.outcomes_total
            .with_label_values(&[stage, report.outcome.status().as_str()])
            .inc();
        self.pipeline_seconds
            .with_label_values(&[stage])
            .observe(report.elapsed.as_secs_f64());

        if let DispatchOutcome::Executed {
            signal, quantity, ..
        } = &report.outcome
        {
            self.order_quantity
                .with_label_values(&[signal.side.as_str()])
                .set(quantity.to_f64().unwrap_or_default());
        }
    }
}
