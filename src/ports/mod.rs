//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `MarketDataPort`: Balance and last-price reads
//! - `OrderPort`: Order submission
//! - `SignalFeed`: Inbound channel messages
//! - `DispatchObserver`: Per-message outcome reporting

pub mod market_data;
pub mod observer;
pub mod orders;
pub mod signal_feed;

pub use market_data::MarketDataPort;
pub use observer::{DispatchObserver, NoopObserver};
pub use orders::{OrderAck, OrderPort};
pub use signal_feed::{InboundMessage, SignalFeed};
