//! Bot abstraction for the outbound side of the messaging transport.
//!
//! [`Bot`] is transport-agnostic; conductor-telegram implements it via teloxide and tests substitute
//! recording fakes.

use crate::error::{BotError, Result};
use crate::types::{Chat, Keyboard};
use async_trait::async_trait;

/// Outbound transport operations. Message ids are transport-specific strings (Telegram: numeric).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends plain text and returns the id of the sent message.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Sends Markdown-formatted text, optionally with an inline keyboard, and returns the sent message id.
    async fn send_formatted(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<String>;
    /// Deletes a message from the chat.
    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()>;
    /// Shows the "typing…" indicator in the chat.
    async fn send_typing(&self, chat: &Chat) -> Result<()>;
}

/// Parses a message id string into an i32. Used by transports that key messages numerically.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| BotError::Transport(format!("Invalid message_id: {}", s)))
}
