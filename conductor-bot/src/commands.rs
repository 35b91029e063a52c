//! Slash commands understood by the bot; also registered with Telegram at startup.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "главное меню")]
    Start,
    #[command(description = "помощь по боту")]
    Help,
    #[command(description = "меню проводника")]
    Menu,
}

impl Command {
    /// Parses `text` as a command addressed to this bot. `/start@other_bot` and unknown commands
    /// yield `None`.
    pub fn parse_for(text: &str, bot_username: &str) -> Option<Self> {
        <Self as BotCommands>::parse(text, bot_username).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(Command::parse_for("/start", "conductor_bot"), Some(Command::Start));
        assert_eq!(Command::parse_for("/help", "conductor_bot"), Some(Command::Help));
        assert_eq!(Command::parse_for("/menu", "conductor_bot"), Some(Command::Menu));
    }

    #[test]
    fn test_parse_addressed_command() {
        assert_eq!(
            Command::parse_for("/start@conductor_bot", "conductor_bot"),
            Some(Command::Start)
        );
        assert_eq!(Command::parse_for("/start@other_bot", "conductor_bot"), None);
    }

    #[test]
    fn test_unknown_command_is_none() {
        assert_eq!(Command::parse_for("/weather", "conductor_bot"), None);
    }

    #[test]
    fn test_bot_commands_listed_in_order() {
        let names: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command.trim_start_matches('/').to_string())
            .collect();
        assert_eq!(names, vec!["start", "help", "menu"]);
    }
}
