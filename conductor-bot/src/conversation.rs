//! # Conversation handler
//!
//! One free-text message is one turn, processed strictly in order:
//!
//! 1. delete the user's previous question and answer (both attempted, failures only logged);
//! 2. show the typing indicator (best-effort);
//! 3. ask the [`AiGateway`];
//! 4. send the answer and store `{question, answer}` as the user's new window;
//! 5. or, when the gateway fails, send [`FALLBACK_TEXT`] and leave the window untouched.
//!
//! The user's window stays locked for the whole turn, so a second message from the same user
//! waits for the first to finish.

use std::sync::Arc;

use async_trait::async_trait;
use conductor_core::{Bot, BotError, Event, Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument, warn};

use crate::gateway::AiGateway;
use crate::window::{ConversationWindow, WindowStore};

pub const FALLBACK_TEXT: &str =
    "😔 Извините, AI временно недоступен.\nПопробуйте выбрать раздел из меню /start";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered { answer_message_id: String },
    Fallback,
}

pub struct ConversationHandler {
    bot: Arc<dyn Bot>,
    gateway: Arc<AiGateway>,
    windows: Arc<WindowStore>,
}

impl ConversationHandler {
    pub fn new(bot: Arc<dyn Bot>, gateway: Arc<AiGateway>, windows: Arc<WindowStore>) -> Self {
        Self {
            bot,
            gateway,
            windows,
        }
    }

    /// Runs one turn for `message`. Only a failed send of the answer or the fallback is returned
    /// as an error.
    #[instrument(
        skip(self, message),
        fields(user_id = message.user.id, chat_id = message.chat.id, message_id = %message.id)
    )]
    pub async fn handle_user_text(&self, message: &Message) -> Result<TurnOutcome> {
        let mut window = self.windows.lock(message.user.id).await;

        if let Some(previous) = window.window() {
            self.delete_previous(previous).await;
        }

        if let Err(e) = self.bot.send_typing(&message.chat).await {
            warn!(error = %e, "Failed to send typing indicator");
        }

        match self.gateway.complete(&message.content).await {
            Ok(answer) => {
                let answer_message_id = self.bot.send_message(&message.chat, &answer).await?;
                window.replace(ConversationWindow {
                    chat: message.chat.clone(),
                    question_message_id: message.id.clone(),
                    answer_message_id: answer_message_id.clone(),
                });
                info!(answer_message_id = %answer_message_id, "Answer sent");
                Ok(TurnOutcome::Answered { answer_message_id })
            }
            Err(BotError::Upstream(reason)) => {
                warn!(reason = %reason, "AI unavailable, sending fallback");
                self.bot.send_message(&message.chat, FALLBACK_TEXT).await?;
                Ok(TurnOutcome::Fallback)
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_previous(&self, previous: &ConversationWindow) {
        for message_id in [&previous.question_message_id, &previous.answer_message_id] {
            if let Err(e) = self.bot.delete_message(&previous.chat, message_id).await {
                warn!(error = %e, message_id = %message_id, "Failed to delete previous message");
            }
        }
        info!(
            question_message_id = %previous.question_message_id,
            answer_message_id = %previous.answer_message_id,
            "Previous turn cleaned up"
        );
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        let Event::Text(message) = event else {
            return Ok(HandlerResponse::Ignore);
        };
        self.handle_user_text(message).await?;
        Ok(HandlerResponse::Stop)
    }
}
