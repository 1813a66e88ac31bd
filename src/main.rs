//! Bybit Signal Relay - Entry Point
//!
//! Wires the Telegram listener, the signal dispatcher and the Bybit
//! adapters, then runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load `.env`, then config.toml (path from RELAY_CONFIG) + env overrides
//! 2. Init tracing (JSON or compact)
//! 3. Load Bybit credentials (BYBIT_API_KEY, BYBIT_API_SECRET)
//! 4. Create BybitClient, market data and order adapters (dry run swaps orders)
//! 5. Create SignalDispatcher with the Prometheus observer
//! 6. Spawn health/metrics server, Telegram listener and dispatcher
//! 7. Wait for SIGINT → readiness 503 → broadcast shutdown → drain

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bybit_signal_relay::adapters::bybit::{
    BybitAuth, BybitClient, BybitClientConfig, BybitMarketData, BybitOrders,
};
use bybit_signal_relay::adapters::dry_run::DryRunOrders;
use bybit_signal_relay::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use bybit_signal_relay::adapters::telegram::TelegramChannel;
use bybit_signal_relay::config::loader::{load_config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use bybit_signal_relay::config::{BotConfig, LogFormat};
use bybit_signal_relay::domain::sizing::TradingMode;
use bybit_signal_relay::ports::observer::DispatchObserver;
use bybit_signal_relay::ports::orders::OrderPort;
use bybit_signal_relay::ports::signal_feed::SignalFeed;
use bybit_signal_relay::usecases::SignalDispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let _ = dotenvy::dotenv();
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path).context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    init_tracing(&config.bot);

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        mode = %config.trading.mode,
        testnet = config.exchange.testnet,
        dry_run = config.bot.dry_run,
        channel = config.telegram.channel_id,
        "Starting signal relay"
    );
    match config.trading.mode {
        TradingMode::Mirror => info!("Orders mirror the signal quantity"),
        TradingMode::Fixed => info!(
            fixed_usdt = %config.trading.fixed_usdt,
            fixed_base_qty = %config.trading.fixed_base_qty,
            "Orders use fixed amounts"
        ),
        TradingMode::AllIn => info!(
            fraction = %config.trading.all_in_fraction,
            "Orders use a fraction of the available balance"
        ),
        TradingMode::Unsupported => {
            warn!("Unrecognised trading mode, every signal will be skipped at sizing");
        }
    }

    // ── 3. Shutdown channel + shared state ──────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = Arc::new(HealthState::new());
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);

    // ── 4. Exchange adapters ────────────────────────────────
    let auth = Arc::new(BybitAuth::from_env().context("Failed to load Bybit credentials")?);
    let client = Arc::new(
        BybitClient::new(auth, BybitClientConfig::from_exchange(&config.exchange))
            .context("Failed to create Bybit client")?,
    );
    info!(base_url = %client.base_url(), "Bybit client ready");

    let market = Arc::new(BybitMarketData::new(Arc::clone(&client), &config.exchange));
    let orders: Arc<dyn OrderPort> = if config.bot.dry_run {
        warn!("Dry-run mode: orders are acknowledged locally, nothing is sent to Bybit");
        Arc::new(DryRunOrders::new())
    } else {
        Arc::new(BybitOrders::new(Arc::clone(&client)))
    };

    // ── 5. Dispatcher ───────────────────────────────────────
    let observer: Arc<dyn DispatchObserver> = metrics.clone();
    let dispatcher = Arc::new(
        SignalDispatcher::new(config.trading.clone(), market, orders).with_observer(observer),
    );
    let channel = TelegramChannel::from_env(config.telegram.channel_id)
        .context("Failed to configure Telegram listener")?;

    // ── 6. Spawn tasks ──────────────────────────────────────
    let health_handle = if config.metrics.enabled {
        let server = HealthServer::new(Arc::clone(&health), Arc::clone(&metrics));
        let bind_address = config.metrics.bind_address.clone();
        let health_shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(bind_address, health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }))
    } else {
        None
    };

    let (inbox_tx, inbox_rx) = mpsc::channel(config.bot.inbox_capacity);

    let feed_shutdown = shutdown_tx.subscribe();
    let feed_handle = tokio::spawn(async move {
        if let Err(e) = channel.run(inbox_tx, feed_shutdown).await {
            error!(error = %format!("{e:#}"), "Telegram listener failed");
        }
    });

    let dispatcher_shutdown = shutdown_tx.subscribe();
    let mut dispatcher_handle =
        tokio::spawn(async move { dispatcher.run(inbox_rx, dispatcher_shutdown).await });

    health.set_ready(true);
    info!("Relay is running");

    // ── 7. Wait for SIGINT or a stopped pipeline ────────────
    let dispatcher_done = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
            false
        }
        _ = &mut dispatcher_handle => {
            warn!("Dispatcher stopped, shutting down");
            true
        }
    };

    health.set_ready(false);
    let _ = shutdown_tx.send(());
    info!("Shutdown signal broadcast to all tasks");

    if !dispatcher_done
        && tokio::time::timeout(Duration::from_secs(30), dispatcher_handle)
            .await
            .is_err()
    {
        warn!("Dispatcher did not finish within 30s");
    }
    let _ = tokio::time::timeout(Duration::from_secs(5), feed_handle).await;
    if let Some(handle) = health_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over `bot.log_level`.
fn init_tracing(bot: &BotConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&bot.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match bot.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
