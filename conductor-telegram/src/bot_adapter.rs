//! Wraps teloxide::Bot and implements [`conductor_core::Bot`]. Every request is bounded by the
//! adapter's timeout; failures and expiries map to [`BotError::Transport`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use conductor_core::{parse_message_id, Bot as CoreBot, BotError, Chat, Keyboard, Result};
use teloxide::{
    prelude::*,
    requests::Request,
    types::{ChatAction, ChatId, MessageId, ParseMode},
    RequestError,
};
use tracing::instrument;

use crate::adapters::keyboard_to_markup;

/// Default bound for a single Bot API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around teloxide::Bot that implements conductor-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
    request_timeout: Duration,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot with [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn new(bot: teloxide::Bot) -> Self {
        Self {
            bot,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, RequestError>>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(BotError::Transport(format!("{}: {}", op, e))),
            Err(_) => Err(BotError::Transport(format!(
                "{}: timed out after {:?}",
                op, self.request_timeout
            ))),
        }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    #[instrument(skip(self, text), fields(chat_id = chat.id, text_len = text.len()))]
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bounded(
                "sendMessage",
                self.bot.send_message(ChatId(chat.id), text.to_string()).send(),
            )
            .await?;
        Ok(sent.id.0.to_string())
    }

    #[instrument(skip(self, text, keyboard), fields(chat_id = chat.id))]
    async fn send_formatted(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<String> {
        // Menu content is authored for the legacy Markdown dialect.
        #[allow(deprecated)]
        let request = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .parse_mode(ParseMode::Markdown);
        let request = match keyboard {
            Some(kb) => request.reply_markup(keyboard_to_markup(kb)),
            None => request,
        };
        let sent = self.bounded("sendMessage", request.send()).await?;
        Ok(sent.id.0.to_string())
    }

    #[instrument(skip(self), fields(chat_id = chat.id))]
    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bounded(
            "deleteMessage",
            self.bot.delete_message(ChatId(chat.id), MessageId(id)).send(),
        )
        .await?;
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.bounded(
            "sendChatAction",
            self.bot
                .send_chat_action(ChatId(chat.id), ChatAction::Typing)
                .send(),
        )
        .await?;
        Ok(())
    }
}
