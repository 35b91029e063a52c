//! Minimal transport configuration: bot token, optional Bot API URL, request timeout.
//! Loaded from `BOT_TOKEN` (or `TELEGRAM_BOT_TOKEN`), `TELEGRAM_API_URL` (or `TELOXIDE_API_URL`)
//! and `TELEGRAM_TIMEOUT_SECS`.

use std::env;
use std::time::Duration;

use conductor_core::{BotError, Result};
use tracing::error;

use crate::bot_adapter::DEFAULT_REQUEST_TIMEOUT;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub request_timeout: Duration,
}

impl TelegramConfig {
    /// Loads from env. `token` overrides `BOT_TOKEN` / `TELEGRAM_BOT_TOKEN`; a missing or blank
    /// token is a [`BotError::Config`].
    pub fn from_env(token: Option<String>) -> Result<Self> {
        let bot_token = token
            .or_else(|| env::var("BOT_TOKEN").ok())
            .or_else(|| env::var("TELEGRAM_BOT_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| BotError::Config("BOT_TOKEN not set".to_string()))?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let request_timeout = match env::var("TELEGRAM_TIMEOUT_SECS") {
            Ok(s) => Duration::from_secs(s.trim().parse().map_err(|_| {
                BotError::Config(format!("TELEGRAM_TIMEOUT_SECS is not a number: {}", s))
            })?),
            Err(_) => DEFAULT_REQUEST_TIMEOUT,
        };
        Ok(Self {
            bot_token,
            telegram_api_url,
            request_timeout,
        })
    }

    /// Creates the teloxide Bot, pointed at `telegram_api_url` when set (e.g. a local Bot API server).
    pub fn build_bot(&self) -> teloxide::Bot {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url.as_deref() {
            Some(url_str) => match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            },
            None => bot,
        }
    }
}
