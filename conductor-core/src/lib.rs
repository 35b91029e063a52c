//! # conductor-core
//!
//! Core types and traits for the conductor bot: [`Bot`], [`Handler`], events, messages, inline
//! keyboards, the [`BotError`] taxonomy and tracing initialization. Transport-agnostic; used by
//! conductor-telegram, handler-chain and conductor-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{
    Button, CallbackQuery, Chat, Event, Handler, HandlerResponse, Keyboard, Message, ToCoreMessage,
    ToCoreUser, User,
};
