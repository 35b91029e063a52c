//! Recording fakes for [`conductor_core::Bot`] and [`llm_client::LlmClient`] plus event builders.
//!
//! MockBot keeps every outbound call in order so tests can assert on the exact sequence of
//! deletes, typing indicators and sends without hitting Telegram.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use conductor_core::{Bot, BotError, CallbackQuery, Chat, Event, Keyboard, Message, Result, User};
use llm_client::LlmClient;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCall {
    Send {
        chat_id: i64,
        text: String,
        message_id: String,
    },
    SendFormatted {
        chat_id: i64,
        text: String,
        keyboard: Option<Keyboard>,
        message_id: String,
    },
    Delete {
        chat_id: i64,
        message_id: String,
    },
    Typing {
        chat_id: i64,
    },
}

/// Mock Bot that hands out increasing message ids (from 1000) and can be told to fail
/// deletes, typing or sends.
pub struct MockBot {
    calls: Mutex<Vec<BotCall>>,
    next_id: AtomicI64,
    pub fail_deletes: AtomicBool,
    pub fail_typing: AtomicBool,
    pub fail_sends: AtomicBool,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1000),
            fail_deletes: AtomicBool::new(false),
            fail_typing: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> Vec<BotCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::Delete { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    /// Texts of plain (non-formatted) sends.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// (text, keyboard) of formatted sends.
    pub fn menus(&self) -> Vec<(String, Option<Keyboard>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::SendFormatted { text, keyboard, .. } => Some((text, keyboard)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BotCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_message_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(BotError::Transport("send failed".to_string()));
        }
        let message_id = self.next_message_id();
        self.record(BotCall::Send {
            chat_id: chat.id,
            text: text.to_string(),
            message_id: message_id.clone(),
        });
        Ok(message_id)
    }

    async fn send_formatted(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(BotError::Transport("send failed".to_string()));
        }
        let message_id = self.next_message_id();
        self.record(BotCall::SendFormatted {
            chat_id: chat.id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
            message_id: message_id.clone(),
        });
        Ok(message_id)
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        // Recorded even when failing: the attempt is what matters.
        self.record(BotCall::Delete {
            chat_id: chat.id,
            message_id: message_id.to_string(),
        });
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(BotError::Transport("message can't be deleted".to_string()));
        }
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.record(BotCall::Typing { chat_id: chat.id });
        if self.fail_typing.load(Ordering::SeqCst) {
            return Err(BotError::Transport("typing failed".to_string()));
        }
        Ok(())
    }
}

/// Mock LLM that answers `"Ответ: <question>"`, or fails while `failing` is set.
pub struct MockLlm {
    questions: Mutex<Vec<String>>,
    pub failing: AtomicBool,
    delay: Duration,
}

impl MockLlm {
    pub fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    /// Each completion sleeps `delay` first (use with paused time).
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            questions: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            delay,
        })
    }

    pub fn failing() -> Arc<Self> {
        let llm = Self::new();
        llm.failing.store(true, Ordering::SeqCst);
        llm
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn answer_for(question: &str) -> String {
        format!("Ответ: {}", question)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn create_completion(
        &self,
        _system_preamble: &str,
        question: &str,
        _temperature: f32,
    ) -> anyhow::Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("upstream unavailable");
        }
        Ok(Self::answer_for(question))
    }
}

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("passenger{}", id)),
        first_name: Some("Пассажир".to_string()),
        last_name: None,
    }
}

pub fn chat(id: i64) -> Chat {
    Chat {
        id,
        chat_type: "private".to_string(),
    }
}

/// Text message from user `user_id` in the private chat with the same id.
pub fn text_message(user_id: i64, message_id: &str, content: &str) -> Message {
    Message {
        id: message_id.to_string(),
        user: user(user_id),
        chat: chat(user_id),
        content: content.to_string(),
    }
}

pub fn text_event(user_id: i64, message_id: &str, content: &str) -> Event {
    Event::Text(text_message(user_id, message_id, content))
}

pub fn command_event(user_id: i64, message_id: &str, command: &str) -> Event {
    Event::Command(text_message(user_id, message_id, command))
}

pub fn button_event(user_id: i64, data: &str) -> Event {
    Event::Callback(CallbackQuery {
        user: user(user_id),
        chat: chat(user_id),
        data: data.to_string(),
    })
}
