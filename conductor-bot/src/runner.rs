use std::path::Path;

use anyhow::{Context, Result};
use conductor_core::init_tracing;
use conductor_telegram::{run_dispatcher, ErrorReply};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, instrument, warn};

use crate::commands::Command;
use crate::components::{build_bot_components, build_handler_chain};
use crate::config::BotConfig;

/// Sent when a message event fails outside the AI fallback path.
pub const ERROR_NOTICE: &str = "😔 Произошла ошибка. Попробуйте позже или нажмите /start";

/// Main entry: init logging, build components and the handler chain, register commands, start
/// the window sweeper, then run the dispatcher until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    if let Some(dir) = Path::new(&config.log_file)
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    init_tracing(Some(config.log_file.as_str()))?;

    info!("🚂 AI conductor starting");

    let components = match build_bot_components(&config) {
        Ok(components) => components,
        Err(e) => {
            error!(error = %e, "Cannot start bot");
            return Err(e.into());
        }
    };
    let handler_chain = build_handler_chain(
        components.bot.clone(),
        components.navigation.clone(),
        components.gateway.clone(),
        components.windows.clone(),
        components.bot_username.clone(),
    );

    register_commands(&components.teloxide_bot).await;

    let sweeper = components.windows.clone().spawn_sweeper();

    info!("Bot started successfully");
    let result = run_dispatcher(
        components.teloxide_bot.clone(),
        handler_chain,
        components.bot_username.clone(),
        ErrorReply(ERROR_NOTICE.to_string()),
    )
    .await;

    sweeper.abort();
    info!("Bot stopped");
    result
}

async fn register_commands(bot: &teloxide::Bot) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Bot commands registered"),
        Err(e) => warn!(error = %e, "Failed to register bot commands"),
    }
}
