//! Telegram Channel Feed - Signal Source
//!
//! Long-polls the Bot API through teloxide and forwards the text (or
//! media caption) of every post in the configured channel into the
//! dispatcher inbox. Posts from any other chat are dropped here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::requests::{Requester, ResponseResult};
use teloxide::types::{ChatId, Message, Update};
use teloxide::Bot;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument, warn};

use crate::ports::signal_feed::{InboundMessage, SignalFeed};

/// Bot token environment variable.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Listener bound to one Telegram channel.
pub struct TelegramChannel {
    /// Bot API client.
    bot: Bot,
    /// Channel whose posts are relayed.
    channel: ChatId,
}

impl TelegramChannel {
    /// Create a listener for `channel_id` using `token`.
    pub fn new(token: impl Into<String>, channel_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            channel: ChatId(channel_id),
        }
    }

    /// Create a listener with the token from TELEGRAM_BOT_TOKEN.
    pub fn from_env(channel_id: i64) -> Result<Self> {
        let token =
            std::env::var(BOT_TOKEN_ENV).with_context(|| format!("{BOT_TOKEN_ENV} not set"))?;
        Ok(Self::new(token, channel_id))
    }
}

#[async_trait]
impl SignalFeed for TelegramChannel {
    #[instrument(skip_all, fields(channel = self.channel.0))]
    async fn run(
        &self,
        inbox: mpsc::Sender<InboundMessage>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let me = self
            .bot
            .get_me()
            .await
            .context("Telegram bot authentication failed")?;
        info!(bot = ?me.user.username, "Listening for channel posts");

        let handler = Update::filter_channel_post()
            .filter(|post: Message, channel: ChatId| post.chat.id == channel)
            .endpoint(forward_post);

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![inbox, self.channel])
            .default_handler(|_| async {})
            .error_handler(LoggingErrorHandler::with_custom_text(
                "Telegram update handler failed",
            ))
            .build();

        tokio::select! {
            () = dispatcher.dispatch() => warn!("Telegram polling stopped"),
            _ = shutdown_rx.recv() => info!("Telegram listener received shutdown signal"),
        }

        Ok(())
    }
}

/// Push one channel post into the inbox.
async fn forward_post(post: Message, inbox: mpsc::Sender<InboundMessage>) -> ResponseResult<()> {
    let Some(text) = post.text().or_else(|| post.caption()) else {
        return Ok(());
    };

    debug!(message_id = post.id.0, "Channel post received");
    if inbox.send(InboundMessage::new(text)).await.is_err() {
        warn!("Dispatcher inbox closed, dropping post");
    }
    Ok(())
}
