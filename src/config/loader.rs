//! Configuration Loader - File Loading, Overrides and Validation
//!
//! Resolution order: built-in defaults, then `config.toml` (if present),
//! then environment variables. The result is validated once and never
//! reloaded.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use super::AppConfig;
use crate::domain::sizing::TradingMode;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load, override and validate configuration.
///
/// # Arguments
/// * `path` - Path to the config.toml file (may not exist)
///
/// # Errors
/// Returns detailed error if:
/// - The file exists but can't be read or parsed
/// - An environment override is malformed
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = if path.exists() {
    Some(
      std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?,
    )
  } else {
    None
  };

  build_config(content.as_deref(), |key| std::env::var(key).ok())
}

/// Assemble configuration from optional TOML text and an env lookup.
pub fn build_config(
  content: Option<&str>,
  env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
  let mut config: AppConfig = match content {
    Some(text) => toml::from_str(text).context("Failed to parse config.toml")?,
    None => AppConfig::default(),
  };

  apply_env_overrides(&mut config, env)?;
  validate_config(&config)?;

  Ok(config)
}

/// Apply environment overrides on top of file values.
fn apply_env_overrides(
  config: &mut AppConfig,
  env: impl Fn(&str) -> Option<String>,
) -> Result<()> {
  if let Some(mode) = env("TRADING_MODE") {
    let Ok(mode) = mode.parse::<TradingMode>();
    config.trading.mode = mode;
  }
  if let Some(value) = env("FIXED_AMOUNT_USDT") {
    config.trading.fixed_usdt = parse_decimal("FIXED_AMOUNT_USDT", &value)?;
  }
  if let Some(value) = env("FIXED_AMOUNT_ETH") {
    config.trading.fixed_base_qty = parse_decimal("FIXED_AMOUNT_ETH", &value)?;
  }
  if let Some(value) = env("ALL_IN_PERCENTAGE") {
    config.trading.all_in_fraction = parse_decimal("ALL_IN_PERCENTAGE", &value)?;
  }
  if let Some(value) = env("TESTNET") {
    config.exchange.testnet = parse_flag(&value);
  }
  if let Some(value) = env("DRY_RUN") {
    config.bot.dry_run = parse_flag(&value);
  }
  if let Some(value) = env("LOG_LEVEL") {
    config.bot.log_level = value;
  }
  if let Some(value) = env("TELEGRAM_CHANNEL_ID") {
    config.telegram.channel_id = value
      .trim()
      .parse()
      .with_context(|| format!("TELEGRAM_CHANNEL_ID must be an integer, got {value:?}"))?;
  }
  Ok(())
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal> {
  Decimal::from_str(value.trim())
    .with_context(|| format!("{key} must be a decimal number, got {value:?}"))
}

fn parse_flag(value: &str) -> bool {
  value.trim().eq_ignore_ascii_case("true")
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Positive sizing amounts
/// - All-in fraction within (0, 1]
/// - Representable quantity precision
/// - Non-empty endpoints and a channel to listen to
fn validate_config(config: &AppConfig) -> Result<()> {
  let trading = &config.trading;

  anyhow::ensure!(
    trading.fixed_usdt > Decimal::ZERO,
    "fixed_usdt must be positive, got {}",
    trading.fixed_usdt
  );
  anyhow::ensure!(
    trading.fixed_base_qty > Decimal::ZERO,
    "fixed_base_qty must be positive, got {}",
    trading.fixed_base_qty
  );
  anyhow::ensure!(
    trading.all_in_fraction > Decimal::ZERO && trading.all_in_fraction <= Decimal::ONE,
    "all_in_fraction must be in (0, 1], got {}",
    trading.all_in_fraction
  );
  anyhow::ensure!(
    trading.qty_precision <= 18,
    "qty_precision must be at most 18, got {}",
    trading.qty_precision
  );
  anyhow::ensure!(
    !trading.quote_asset.trim().is_empty(),
    "quote_asset must not be empty"
  );

  let exchange = &config.exchange;
  anyhow::ensure!(
    !exchange.base_url().is_empty(),
    "Exchange base URL must not be empty"
  );
  anyhow::ensure!(exchange.timeout_ms > 0, "timeout_ms must be positive");
  anyhow::ensure!(exchange.recv_window_ms > 0, "recv_window_ms must be positive");

  anyhow::ensure!(
    config.telegram.channel_id != 0,
    "telegram.channel_id (or TELEGRAM_CHANNEL_ID) must be set"
  );
  anyhow::ensure!(config.bot.inbox_capacity > 0, "inbox_capacity must be positive");

  Ok(())
}
