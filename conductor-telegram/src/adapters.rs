//! Adapters from Telegram (teloxide) types to conductor_core types, and from core keyboards back to
//! Telegram inline markup.

use conductor_core::{
    Button, CallbackQuery, Chat, Event, Keyboard, Message, ToCoreMessage, ToCoreUser, User,
};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn anonymous_user() -> User {
    User {
        id: 0,
        username: None,
        first_name: None,
        last_name: None,
    }
}

fn core_chat(chat: &teloxide::types::Chat) -> Chat {
    Chat {
        id: chat.id.0,
        chat_type: if chat.is_private() {
            "private".to_string()
        } else {
            format!("{:?}", chat.kind)
        },
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.0.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(anonymous_user),
            chat: core_chat(&self.0.chat),
            content: self.0.text().unwrap_or("").to_string(),
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    /// Builds the core event for a text message; `None` for messages without text.
    pub fn to_event(&self) -> Option<Event> {
        let text = self.0.text()?;
        let message = self.to_core();
        Some(match classify_text(text) {
            TextKind::Command => Event::Command(message),
            TextKind::Free => Event::Text(message),
        })
    }
}

/// Wraps a teloxide CallbackQuery for conversion to a core [`CallbackQuery`].
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> TelegramCallbackWrapper<'a> {
    /// `None` when the press carries no data or its message is gone (no chat to answer in).
    pub fn to_core(&self) -> Option<CallbackQuery> {
        let data = self.0.data.clone()?;
        let message = self.0.message.as_ref()?;
        Some(CallbackQuery {
            user: TelegramUserWrapper(&self.0.from).to_core(),
            chat: core_chat(message.chat()),
            data,
        })
    }

    pub fn to_event(&self) -> Option<Event> {
        self.to_core().map(Event::Callback)
    }
}

/// Whether a text message is a bot command or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Command,
    Free,
}

/// Commands start with `/` followed by at least one non-space character.
pub fn classify_text(text: &str) -> TextKind {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix('/') {
        Some(rest) if rest.chars().next().is_some_and(|c| !c.is_whitespace()) => {
            TextKind::Command
        }
        _ => TextKind::Free,
    }
}

/// Converts a core keyboard into Telegram inline markup (callback buttons).
pub fn keyboard_to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|Button { label, data }| {
                InlineKeyboardButton::callback(label.clone(), data.clone())
            })
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: TelegramUserWrapper converts teloxide User to core User with correct id, username, first_name, last_name.**
    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
    }

    #[test]
    fn test_classify_text() {
        assert_eq!(classify_text("/start"), TextKind::Command);
        assert_eq!(classify_text("  /help@conductor_bot"), TextKind::Command);
        assert_eq!(classify_text("Hello"), TextKind::Free);
        assert_eq!(classify_text("/"), TextKind::Free);
        assert_eq!(classify_text("/ spaced"), TextKind::Free);
        assert_eq!(classify_text("1/2 of the way"), TextKind::Free);
    }

    #[test]
    fn test_keyboard_to_markup_keeps_rows() {
        let keyboard = Keyboard {
            rows: vec![
                vec![Button::new("🚂 Мой поезд", "my_train")],
                vec![Button::new("A", "a"), Button::new("B", "b")],
            ],
        };

        let markup = keyboard_to_markup(&keyboard);

        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "🚂 Мой поезд");
        assert_eq!(markup.inline_keyboard[1].len(), 2);
    }
}
