//! CLI parser and config loading.

use clap::{Parser, Subcommand};
use conductor_core::Result;

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "conductor-bot")]
#[command(about = "AI train conductor Telegram bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["conductor-bot", "run", "--token", "123:abc"]).unwrap();
        let Commands::Run { token } = cli.command;
        assert_eq!(token.as_deref(), Some("123:abc"));
    }

    #[test]
    fn test_parse_run_without_token() {
        let cli = Cli::try_parse_from(["conductor-bot", "run"]).unwrap();
        let Commands::Run { token } = cli.command;
        assert!(token.is_none());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["conductor-bot"]).is_err());
    }
}
