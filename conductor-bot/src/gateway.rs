//! # AI response gateway
//!
//! Wraps a passenger question in the conductor persona, calls the [`LlmClient`] under a timeout
//! and returns the answer text. Every failure (error, timeout, empty reply) comes back as
//! [`BotError::Upstream`]. No retries, no caching.

use std::sync::Arc;
use std::time::Duration;

use conductor_core::{BotError, Result};
use llm_client::{LlmClient, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
use tracing::{debug, instrument, warn};

pub const DEFAULT_PREAMBLE: &str = "Ты - AI Проводник в поезде дальнего следования.
Ты помогаешь пассажирам с информацией о поезде, маршруте, услугах и отвечаешь на вопросы.
Отвечай дружелюбно, кратко и по делу. Используй эмодзи для наглядности.";

/// Telegram rejects text messages longer than this, counted in UTF-16 code units.
pub const MAX_ANSWER_LEN: usize = 4096;

pub struct AiGateway {
    llm: Arc<dyn LlmClient>,
    preamble: String,
    temperature: f32,
    timeout: Duration,
}

impl AiGateway {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            preamble: DEFAULT_PREAMBLE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn complete(&self, question: &str) -> Result<String> {
        let call = self
            .llm
            .create_completion(&self.preamble, question, self.temperature);

        let answer = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                warn!(error = %e, "LLM request failed");
                return Err(BotError::Upstream(format!("{:#}", e)));
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "LLM request timed out");
                return Err(BotError::Upstream(format!(
                    "LLM request timed out after {:?}",
                    self.timeout
                )));
            }
        };

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(BotError::Upstream("LLM returned an empty answer".to_string()));
        }
        debug!(answer_len = answer.len(), "LLM answered");
        Ok(truncate_utf16(answer, MAX_ANSWER_LEN))
    }
}

/// Cuts `text` to at most `max_units` UTF-16 code units without splitting a character.
fn truncate_utf16(text: &str, max_units: usize) -> String {
    let mut units = 0;
    for (idx, c) in text.char_indices() {
        units += c.len_utf16();
        if units > max_units {
            return text[..idx].to_string();
        }
    }
    text.to_string()
}
