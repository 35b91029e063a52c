//! # AI conductor bot
//!
//! Telegram assistant for long-distance train passengers. Commands and inline buttons browse a
//! static menu catalog; free text goes to an OpenAI-compatible LLM, and each user's previous
//! question/answer pair is deleted before the next answer is sent.
//!
//! Transport lives in conductor-telegram, core types in conductor-core, the LLM client in
//! llm-client; this crate holds the bot's behavior and wiring.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod navigation;
pub mod runner;
pub mod window;

pub use catalog::{MenuCatalog, MenuNode, BACK_TO_MENU_ID, ROOT_ID};
pub use cli::{load_config, Cli, Commands};
pub use commands::Command;
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::BotConfig;
pub use conversation::{ConversationHandler, TurnOutcome, FALLBACK_TEXT};
pub use gateway::{AiGateway, DEFAULT_PREAMBLE, MAX_ANSWER_LEN};
pub use navigation::{NavigationController, NavigationHandler, RenderedMenu};
pub use runner::{run_bot, ERROR_NOTICE};
pub use window::{ConversationWindow, WindowConfig, WindowGuard, WindowStore};
