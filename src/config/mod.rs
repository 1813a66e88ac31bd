//! Configuration Module - TOML-based Relay Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variable overrides via `.env` files. Every field has a
//! default, so a missing file (or section) is valid and the relay can
//! be configured from the environment alone. Credentials are never
//! read from the file.

pub mod loader;

use serde::Deserialize;

use crate::domain::sizing::TradingModeConfig;

/// Top-level relay configuration.
///
/// Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Process identity, logging and dry-run switch.
  #[serde(default)]
  pub bot: BotConfig,
  /// Position sizing policy.
  #[serde(default)]
  pub trading: TradingModeConfig,
  /// Bybit REST API settings.
  #[serde(default)]
  pub exchange: ExchangeConfig,
  /// Signal channel settings.
  #[serde(default)]
  pub telegram: TelegramConfig,
  /// Metrics and health endpoints.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// One JSON object per event.
  #[default]
  Json,
  /// Single-line human readable output.
  Compact,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable bot name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Log output format.
  #[serde(default)]
  pub log_format: LogFormat,
  /// Enable dry-run mode (no real orders).
  #[serde(default)]
  pub dry_run: bool,
  /// Inbound messages buffered ahead of the dispatcher.
  #[serde(default = "default_inbox_capacity")]
  pub inbox_capacity: usize,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      log_format: LogFormat::default(),
      dry_run: false,
      inbox_capacity: default_inbox_capacity(),
    }
  }
}

/// Bybit v5 REST API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
  /// Trade against the testnet instead of mainnet.
  #[serde(default)]
  pub testnet: bool,
  /// Mainnet REST base URL.
  #[serde(default = "default_mainnet_url")]
  pub mainnet_url: String,
  /// Testnet REST base URL.
  #[serde(default = "default_testnet_url")]
  pub testnet_url: String,
  /// Wallet account type queried for balances.
  #[serde(default = "default_account_type")]
  pub account_type: String,
  /// Product category used for last-price reads.
  #[serde(default = "default_price_category")]
  pub price_category: String,
  /// Signature validity window (milliseconds).
  #[serde(default = "default_recv_window")]
  pub recv_window_ms: u64,
  /// Request timeout (milliseconds).
  #[serde(default = "default_timeout")]
  pub timeout_ms: u64,
}

impl ExchangeConfig {
  /// REST base URL for the selected environment.
  pub fn base_url(&self) -> &str {
    if self.testnet {
      &self.testnet_url
    } else {
      &self.mainnet_url
    }
  }
}

impl Default for ExchangeConfig {
  fn default() -> Self {
    Self {
      testnet: false,
      mainnet_url: default_mainnet_url(),
      testnet_url: default_testnet_url(),
      account_type: default_account_type(),
      price_category: default_price_category(),
      recv_window_ms: default_recv_window(),
      timeout_ms: default_timeout(),
    }
  }
}

/// Signal channel configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
  /// Chat id of the channel to listen to (e.g. `-1001234567890`).
  #[serde(default)]
  pub channel_id: i64,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Serve /live, /ready and /metrics.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Bind address of the metrics/health server.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_metrics_addr(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "bybit-signal-relay".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_inbox_capacity() -> usize {
  64
}

fn default_mainnet_url() -> String {
  "https://api.bybit.com".to_string()
}

fn default_testnet_url() -> String {
  "https://api-testnet.bybit.com".to_string()
}

fn default_account_type() -> String {
  "UNIFIED".to_string()
}

fn default_price_category() -> String {
  "spot".to_string()
}

const fn default_recv_window() -> u64 {
  5_000
}

const fn default_timeout() -> u64 {
  10_000
}

const fn default_true() -> bool {
  true
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}
