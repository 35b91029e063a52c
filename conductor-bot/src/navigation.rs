//! # Menu navigation
//!
//! [`NavigationController`] turns a button id into the text and keyboard to send; it holds no
//! per-user state. [`NavigationHandler`] wires it into the handler chain for commands and
//! button presses: exactly one outbound message per handled event, earlier menus are never
//! edited or deleted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use conductor_core::{
    Bot, BotError, Button, CallbackQuery, Chat, Event, Handler, HandlerResponse, Keyboard, Message,
    Result,
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::catalog::{MenuCatalog, BACK_TO_MENU_ID, ROOT_ID};
use crate::commands::Command;

/// Placeholder replaced with the current `HH:MM` when a node is rendered.
pub const TIME_PLACEHOLDER: &str = "{time}";

/// Id of the node shown by `/menu`.
pub const FOOD_MENU_ID: &str = "menu";

/// Text and buttons ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMenu {
    pub text: String,
    pub keyboard: Keyboard,
}

pub struct NavigationController {
    catalog: Arc<MenuCatalog>,
    utc_offset: FixedOffset,
}

impl NavigationController {
    pub fn new(catalog: Arc<MenuCatalog>, utc_offset: FixedOffset) -> Self {
        Self {
            catalog,
            utc_offset,
        }
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn render(&self, id: &str) -> Result<RenderedMenu> {
        self.render_at(id, Utc::now())
    }

    /// Renders `id` as of `now`. The root (and its `back_to_menu` alias) gets the full top-level
    /// keyboard; every other node gets its own children followed by the back button.
    pub fn render_at(&self, id: &str, now: DateTime<Utc>) -> Result<RenderedMenu> {
        let node = self
            .catalog
            .get(id)
            .ok_or_else(|| BotError::UnknownButton(id.to_string()))?;

        let mut buttons = node.buttons.clone();
        if id != ROOT_ID && id != BACK_TO_MENU_ID {
            buttons.push(Button::new(self.catalog.back_label(), BACK_TO_MENU_ID));
        }

        Ok(RenderedMenu {
            text: self.fill_placeholders(&node.text, now),
            keyboard: Keyboard::single_column(buttons),
        })
    }

    fn fill_placeholders(&self, text: &str, now: DateTime<Utc>) -> String {
        if !text.contains(TIME_PLACEHOLDER) {
            return text.to_string();
        }
        let local = now.with_timezone(&self.utc_offset);
        text.replace(TIME_PLACEHOLDER, &local.format("%H:%M").to_string())
    }
}

/// Handles `/start`, `/help`, `/menu` and inline button presses. Free text is left to the next
/// handler.
pub struct NavigationHandler {
    bot: Arc<dyn Bot>,
    controller: Arc<NavigationController>,
    bot_username: Arc<RwLock<Option<String>>>,
}

impl NavigationHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        controller: Arc<NavigationController>,
        bot_username: Arc<RwLock<Option<String>>>,
    ) -> Self {
        Self {
            bot,
            controller,
            bot_username,
        }
    }

    async fn show(&self, chat: &Chat, id: &str) -> Result<()> {
        let menu = self.controller.render(id)?;
        self.bot
            .send_formatted(chat, &menu.text, Some(&menu.keyboard))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn on_command(&self, message: &Message) -> Result<HandlerResponse> {
        let username = self.bot_username.read().await.clone().unwrap_or_default();
        let Some(command) = Command::parse_for(&message.content, &username) else {
            debug!(command = %message.content, "Unknown command ignored");
            return Ok(HandlerResponse::Ignore);
        };

        info!(command = ?command, "Handling command");
        match command {
            Command::Start => self.show(&message.chat, ROOT_ID).await?,
            Command::Menu => match self.show(&message.chat, FOOD_MENU_ID).await {
                Err(BotError::UnknownButton(id)) => {
                    debug!(button_id = %id, "Catalog has no food menu node")
                }
                other => other?,
            },
            Command::Help => {
                self.bot
                    .send_formatted(&message.chat, self.controller.catalog().help_text(), None)
                    .await?;
            }
        }
        Ok(HandlerResponse::Stop)
    }

    #[instrument(
        skip(self, press),
        fields(user_id = press.user.id, chat_id = press.chat.id, button_id = %press.data)
    )]
    async fn on_button(&self, press: &CallbackQuery) -> Result<HandlerResponse> {
        match self.show(&press.chat, &press.data).await {
            Ok(()) => {}
            Err(BotError::UnknownButton(id)) => {
                debug!(button_id = %id, "Unknown button ignored");
            }
            Err(e) => return Err(e),
        }
        Ok(HandlerResponse::Stop)
    }
}

#[async_trait]
impl Handler for NavigationHandler {
    async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        match event {
            Event::Command(message) => self.on_command(message).await,
            Event::Callback(press) => self.on_button(press).await,
            Event::Text(_) => Ok(HandlerResponse::Continue),
        }
    }
}
