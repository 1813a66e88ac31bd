//! Signal Dispatcher - Per-message Pipeline
//!
//! Drives one inbound message through:
//! 1. Filter: only text containing `SIGNAL #` goes further
//! 2. Parse: text → `Signal`
//! 3. Size: `Signal` → quantity via the configured mode
//! 4. Execute: quantity > 0 → one order submission
//! 5. Report: structured log event + observer callback
//!
//! Any negative branch short-circuits to the report. Pipelines never
//! overlap: `run` drains the inbox one message at a time and `dispatch`
//! holds a lock for the whole pipeline, so two ALL_IN signals can never
//! size against the same pre-trade balance.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::error::SizingFailure;
use crate::domain::parser::SignalParser;
use crate::domain::report::{DispatchOutcome, DispatchReport};
use crate::domain::sizing::{TradingMode, TradingModeConfig};
use crate::ports::market_data::MarketDataPort;
use crate::ports::observer::{DispatchObserver, NoopObserver};
use crate::ports::orders::OrderPort;
use crate::ports::signal_feed::InboundMessage;

use super::quantity_calculator::QuantityCalculator;
use super::trade_executor::TradeExecutor;

/// Sequences parse → size → execute for every inbound message.
///
/// Owns the sizing configuration and both exchange ports; built once
/// at startup and shared by reference.
pub struct SignalDispatcher<M: MarketDataPort + ?Sized, O: OrderPort + ?Sized> {
  /// Sizing stage.
  calculator: QuantityCalculator<M>,
  /// Execution stage.
  executor: TradeExecutor<O>,
  /// Outcome sink (metrics).
  observer: Arc<dyn DispatchObserver>,
  /// Held for the duration of one pipeline.
  pipeline: Mutex<()>,
}

impl<M: MarketDataPort + ?Sized, O: OrderPort + ?Sized> SignalDispatcher<M, O> {
  /// Create a dispatcher that reports to no observer.
  pub fn new(config: TradingModeConfig, market: Arc<M>, orders: Arc<O>) -> Self {
    Self {
      calculator: QuantityCalculator::new(config, market),
      executor: TradeExecutor::new(orders),
      observer: Arc::new(NoopObserver),
      pipeline: Mutex::new(()),
    }
  }

  /// Attach an outcome observer.
  #[must_use]
  pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
    self.observer = observer;
    self
  }

  /// Active sizing mode.
  pub const fn mode(&self) -> TradingMode {
    self.calculator.config().mode
  }

  /// Consume the inbox until it closes or shutdown is broadcast.
  ///
  /// A message already in the pipeline is finished before exiting.
  pub async fn run(
    &self,
    mut inbox: mpsc::Receiver<InboundMessage>,
    mut shutdown_rx: broadcast::Receiver<()>,
  ) {
    info!(mode = %self.mode(), "Signal dispatcher started");

    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!("Dispatcher received shutdown signal");
          break;
        }
        message = inbox.recv() => {
          let Some(message) = message else {
            info!("Inbox closed, dispatcher stopping");
            break;
          };
          self.dispatch(&message.text).await;
        }
      }
    }
  }

  /// Run the full pipeline for one message and report the outcome.
  pub async fn dispatch(&self, text: &str) -> DispatchReport {
    let _pipeline = self.pipeline.lock().await;

    let dispatch_id = Uuid::new_v4();
    let received_at = Utc::now();
    let started = Instant::now();

    let outcome = self
      .process(text)
      .instrument(info_span!("dispatch", %dispatch_id))
      .await;

    let report = DispatchReport {
      dispatch_id,
      received_at,
      elapsed: started.elapsed(),
      outcome,
    };
    self.report(&report);
    report
  }

  async fn process(&self, text: &str) -> DispatchOutcome {
    if !SignalParser::is_candidate(text) {
      return DispatchOutcome::Ignored;
    }

    let signal = match SignalParser::parse(text) {
      Ok(signal) => signal,
      Err(failure) => return DispatchOutcome::ParseFailed(failure),
    };

    debug!(
      signal_number = signal.signal_number,
      symbol = %signal.symbol,
      side = %signal.side,
      "Valid signal detected"
    );

    let quantity = self.calculator.compute(&signal).await;
    if quantity <= Decimal::ZERO {
      let failure = match self.mode() {
        TradingMode::Unsupported => SizingFailure::UnsupportedMode,
        mode => SizingFailure::NonPositive { mode, quantity },
      };
      return DispatchOutcome::SizingAborted { signal, failure };
    }

    let result = self.executor.execute(&signal, quantity).await;
    DispatchOutcome::Executed {
      signal,
      quantity,
      result,
    }
  }

  /// Single logging boundary for every outcome.
  fn report(&self, report: &DispatchReport) {
    let dispatch_id = report.dispatch_id;
    let stage = report.outcome.stage().as_str();
    let status = report.outcome.status().as_str();
    let elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX);

    match &report.outcome {
      DispatchOutcome::Ignored => {
        debug!(%dispatch_id, stage, status, "Message is not a signal");
      }
      DispatchOutcome::ParseFailed(failure) => {
        warn!(%dispatch_id, stage, status, error = %failure, "Failed to parse signal");
      }
      DispatchOutcome::SizingAborted { signal, failure } => {
        warn!(
          %dispatch_id,
          stage,
          status,
          signal_number = signal.signal_number,
          symbol = %signal.symbol,
          side = %signal.side,
          error = %failure,
          "Trade aborted"
        );
      }
      DispatchOutcome::Executed {
        signal,
        quantity,
        result,
      } if result.success => {
        info!(
          %dispatch_id,
          stage,
          status,
          elapsed_ms,
          signal_number = signal.signal_number,
          symbol = %signal.symbol,
          side = %signal.side,
          %quantity,
          order_id = result.order_id.as_deref().unwrap_or_default(),
          "Order placed"
        );
      }
      DispatchOutcome::Executed {
        signal,
        quantity,
        result,
      } => {
        error!(
          %dispatch_id,
          stage,
          status,
          elapsed_ms,
          signal_number = signal.signal_number,
          symbol = %signal.symbol,
          side = %signal.side,
          %quantity,
          error = result.error_message.as_deref().unwrap_or_default(),
          "Order failed"
        );
      }
    }

    self.observer.observe(report);
  }
}
