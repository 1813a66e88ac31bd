//! Signal Feed Port - Inbound Channel Messages
//!
//! The feed only enqueues messages; the dispatcher drains the queue
//! one message at a time, which is what serializes the pipeline.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

/// One message delivered by the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
  /// Message text (or media caption).
  pub text: String,
}

impl InboundMessage {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into() }
  }
}

/// Trait for inbound message sources.
#[async_trait]
pub trait SignalFeed: Send + Sync + 'static {
  /// Forward messages into `inbox` until shutdown is broadcast.
  ///
  /// # Errors
  /// Returns error if the source cannot be reached at startup.
  async fn run(
    &self,
    inbox: mpsc::Sender<InboundMessage>,
    shutdown_rx: broadcast::Receiver<()>,
  ) -> anyhow::Result<()>;
}
