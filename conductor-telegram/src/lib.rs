//! # conductor-telegram
//!
//! Telegram transport layer: adapters from teloxide types to core events, a [`conductor_core::Bot`]
//! implementation, minimal config, and the dispatcher runner that feeds events into a
//! [`handler_chain::HandlerChain`]. No menu, conversation or AI logic lives here.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{
    classify_text, keyboard_to_markup, TelegramCallbackWrapper, TelegramMessageWrapper,
    TelegramUserWrapper, TextKind,
};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{run_dispatcher, ErrorReply};
