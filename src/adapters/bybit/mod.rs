//! Bybit v5 API Adapter
//!
//! Sub-modules:
//! - `auth`: HMAC-SHA256 header signing
//! - `client`: signed HTTP client, one attempt per request
//! - `market_data`: wallet balance and last price (`MarketDataPort`)
//! - `orders`: order creation (`OrderPort`)
//! - `types`: v5 request/response types

pub mod auth;
pub mod client;
pub mod market_data;
pub mod orders;
pub mod types;

pub use auth::BybitAuth;
pub use client::{BybitClient, BybitClientConfig};
pub use market_data::BybitMarketData;
pub use orders::BybitOrders;
