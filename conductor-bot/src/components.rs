//! Component factory: builds [`BotComponents`] from config and assembles the handler chain.
//! Keeps assembly out of the runner so tests can wire the same chain around fake transports.

use std::sync::Arc;

use conductor_core::{Bot, Result};
use conductor_telegram::TelegramBotAdapter;
use handler_chain::HandlerChain;
use llm_client::{LlmClient, OpenAILlmClient};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::catalog::MenuCatalog;
use crate::config::BotConfig;
use crate::conversation::ConversationHandler;
use crate::gateway::AiGateway;
use crate::navigation::{NavigationController, NavigationHandler};
use crate::window::WindowStore;

/// Long-lived dependencies shared by the handlers and the runner.
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub bot: Arc<dyn Bot>,
    pub bot_username: Arc<RwLock<Option<String>>>,
    pub navigation: Arc<NavigationController>,
    pub gateway: Arc<AiGateway>,
    pub windows: Arc<WindowStore>,
}

#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let catalog = Arc::new(MenuCatalog::load(config.menu_catalog_path.as_deref())?);
    let navigation = Arc::new(NavigationController::new(
        catalog.clone(),
        config.utc_offset()?,
    ));

    let teloxide_bot = config.telegram.build_bot();
    let bot: Arc<dyn Bot> = Arc::new(
        TelegramBotAdapter::new(teloxide_bot.clone())
            .with_request_timeout(config.telegram.request_timeout),
    );

    let llm: Arc<dyn LlmClient> = Arc::new(
        OpenAILlmClient::with_base_url(config.llm.api_key.clone(), config.llm.base_url.clone())
            .with_model(config.llm.model.clone()),
    );
    let mut gateway = AiGateway::new(llm)
        .with_temperature(config.llm.temperature)
        .with_timeout(config.llm.timeout);
    if let Some(prompt) = &config.llm.system_prompt {
        gateway = gateway.with_preamble(prompt.clone());
    }

    let windows = Arc::new(WindowStore::new(config.window.clone()));

    info!(
        menu_nodes = catalog.len(),
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        window_ttl_secs = config.window.ttl.as_secs(),
        window_max_users = config.window.max_users,
        "Bot components built"
    );

    Ok(BotComponents {
        teloxide_bot,
        bot,
        bot_username: Arc::new(RwLock::new(None)),
        navigation,
        gateway: Arc::new(gateway),
        windows,
    })
}

/// Navigation first (commands, buttons), then the conversation handler (free text).
pub fn build_handler_chain(
    bot: Arc<dyn Bot>,
    navigation: Arc<NavigationController>,
    gateway: Arc<AiGateway>,
    windows: Arc<WindowStore>,
    bot_username: Arc<RwLock<Option<String>>>,
) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(NavigationHandler::new(
            bot.clone(),
            navigation,
            bot_username,
        )))
        .add_handler(Arc::new(ConversationHandler::new(bot, gateway, windows)))
}
