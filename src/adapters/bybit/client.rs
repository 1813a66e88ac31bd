//! Bybit HTTP Client - Signed v5 REST Requests
//!
//! Wraps reqwest with Bybit header authentication. One attempt per call:
//! the relay never retries an order submission, and market reads fall
//! back to zero at the adapter level instead.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::auth::BybitAuth;
use super::types::ApiResponse;
use crate::config::ExchangeConfig;

/// Configuration for the Bybit HTTP client.
#[derive(Debug, Clone)]
pub struct BybitClientConfig {
  /// REST base URL (mainnet or testnet).
  pub base_url: String,
  /// Validity window the server allows for the request timestamp.
  pub recv_window_ms: u64,
  /// Request timeout.
  pub timeout: Duration,
}

impl Default for BybitClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.bybit.com".to_string(),
      recv_window_ms: 5000,
      timeout: Duration::from_secs(10),
    }
  }
}

impl BybitClientConfig {
  /// Derive client settings from the exchange section of the config.
  pub fn from_exchange(exchange: &ExchangeConfig) -> Self {
    Self {
      base_url: exchange.base_url().trim_end_matches('/').to_string(),
      recv_window_ms: exchange.recv_window_ms,
      timeout: Duration::from_millis(exchange.timeout_ms),
    }
  }
}

/// Authenticated HTTP client for the Bybit v5 API.
pub struct BybitClient {
  /// Underlying HTTP client.
  http: Client,
  /// Request signer.
  auth: Arc<BybitAuth>,
  /// Client configuration.
  config: BybitClientConfig,
}

impl BybitClient {
  /// Create a new Bybit client.
  pub fn new(auth: Arc<BybitAuth>, config: BybitClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, auth, config })
  }

  /// Base URL requests are sent to.
  pub fn base_url(&self) -> &str {
    &self.config.base_url
  }

  /// Signed GET; the query string is the signed payload.
  pub async fn get<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, &str)],
  ) -> Result<ApiResponse<T>> {
    let url = self.query_url(path, query)?;
    let payload = url.query().unwrap_or_default().to_string();
    let request = self.http.get(url);
    self.send(request, path, &payload).await
  }

  /// Signed POST; the JSON body is the signed payload.
  pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<ApiResponse<T>> {
    let body = serde_json::to_string(body).context("Failed to encode request body")?;
    let url = format!("{}{}", self.config.base_url, path);
    let request = self
      .http
      .post(&url)
      .header(CONTENT_TYPE, "application/json")
      .body(body.clone());
    self.send(request, path, &body).await
  }

  /// Endpoint URL with `query` percent-encoded in the given order.
  ///
  /// Bybit verifies the signature against the query string exactly as it
  /// arrives, so the signed payload is taken from this URL.
  fn query_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let endpoint = format!("{}{}", self.config.base_url, path);
    let url = if query.is_empty() {
      Url::parse(&endpoint)
    } else {
      Url::parse_with_params(&endpoint, query)
    };
    url.with_context(|| format!("Invalid request URL {endpoint}"))
  }

  /// Attach auth headers, send once and decode the envelope.
  async fn send<T: DeserializeOwned>(
    &self,
    request: RequestBuilder,
    path: &str,
    payload: &str,
  ) -> Result<ApiResponse<T>> {
    let timestamp = BybitAuth::timestamp_ms();
    let recv_window = self.config.recv_window_ms.to_string();
    let signature = self.auth.sign(&timestamp, &recv_window, payload);

    let response = request
      .header("X-BAPI-API-KEY", self.auth.api_key())
      .header("X-BAPI-TIMESTAMP", &timestamp)
      .header("X-BAPI-RECV-WINDOW", &recv_window)
      .header("X-BAPI-SIGN", signature)
      .send()
      .await
      .with_context(|| format!("Request to {path} failed"))?;

    let status = response.status();
    let text = response
      .text()
      .await
      .with_context(|| format!("Failed to read response from {path}"))?;
    debug!(path, status = status.as_u16(), "Bybit response");

    if !status.is_success() {
      bail!("HTTP {status} from {path}: {text}");
    }

    serde_json::from_str(&text).with_context(|| format!("Malformed response from {path}: {text}"))
  }
}
