//! Bybit Authentication - HMAC-SHA256 Request Signing
//!
//! Signs every v5 request as
//! `hex(HMAC_SHA256(secret, timestamp + api_key + recv_window + payload))`,
//! where the payload is the query string for GET and the raw JSON body
//! for POST. Credentials come from BYBIT_API_KEY and BYBIT_API_SECRET.

use std::fmt;

use anyhow::{Context, Result};
use chrono::Utc;

/// Bybit API credentials and signer.
pub struct BybitAuth {
    /// API key sent in the X-BAPI-API-KEY header.
    api_key: String,
    /// API secret, only ever used as the HMAC key.
    api_secret: String,
}

impl BybitAuth {
    /// Build from explicit credentials.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Load credentials from BYBIT_API_KEY / BYBIT_API_SECRET.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BYBIT_API_KEY").context("BYBIT_API_KEY not set")?;
        let api_secret =
            std::env::var("BYBIT_API_SECRET").context("BYBIT_API_SECRET not set")?;
        Ok(Self::new(api_key, api_secret))
    }

    /// API key for request headers.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Current Unix time in milliseconds, as Bybit expects it.
    pub fn timestamp_ms() -> String {
        Utc::now().timestamp_millis().to_string()
    }

    /// Hex-encoded signature for one request.
    pub fn sign(&self, timestamp: &str, recv_window: &str, payload: &str) -> String {
        let message = format!("{timestamp}{}{recv_window}{payload}", self.api_key);
        let mac = hmac_sha256::HMAC::mac(message.as_bytes(), self.api_secret.as_bytes());
        hex::encode(mac)
    }
}

impl fmt::Debug for BybitAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BybitAuth")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
