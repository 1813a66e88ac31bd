//! Dispatch Observer Port - Outcome Reporting
//!
//! Receives one report per inbound message, after the pipeline has
//! finished with it. Used for metrics; logging is done by the
//! dispatcher itself.

use crate::domain::report::DispatchReport;

/// Trait for dispatch outcome sinks.
pub trait DispatchObserver: Send + Sync + 'static {
  /// Record a finished dispatch. Must not block.
  fn observe(&self, report: &DispatchReport);
}

/// Observer that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {
  fn observe(&self, _report: &DispatchReport) {}
}
