//! # Bot configuration
//!
//! [`BotConfig`] gathers the transport config, the LLM config and the bot's own settings
//! (log file, conversation window bounds, menu catalog). Everything comes from the
//! environment; `.env` is loaded by the binary before [`BotConfig::load`] runs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;
use conductor_core::{BotError, Result};
use conductor_telegram::TelegramConfig;
use llm_client::EnvLlmConfig;

use crate::window::WindowConfig;

pub const DEFAULT_LOG_FILE: &str = "logs/conductor-bot.log";
/// Krasnoyarsk time, where the built-in route currently is (MSK+4).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub llm: EnvLlmConfig,
    pub log_file: String,
    pub window: WindowConfig,
    pub menu_catalog_path: Option<PathBuf>,
    pub menu_utc_offset_hours: i32,
}

impl BotConfig {
    /// Loads from env. `token` overrides `BOT_TOKEN`. A missing token or LLM key, or any
    /// malformed number, is a [`BotError::Config`].
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram = TelegramConfig::from_env(token)?;
        let llm = EnvLlmConfig::from_env().map_err(|e| BotError::Config(format!("{:#}", e)))?;

        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        let defaults = WindowConfig::default();
        let window = WindowConfig {
            ttl: env_secs("WINDOW_TTL_SECS", defaults.ttl)?,
            max_users: env_parse("WINDOW_MAX_USERS", defaults.max_users)?,
            sweep_interval: env_secs("WINDOW_SWEEP_INTERVAL_SECS", defaults.sweep_interval)?,
        };
        if window.max_users == 0 {
            return Err(BotError::Config("WINDOW_MAX_USERS must be positive".to_string()));
        }
        if window.sweep_interval.is_zero() {
            return Err(BotError::Config(
                "WINDOW_SWEEP_INTERVAL_SECS must be positive".to_string(),
            ));
        }

        let menu_catalog_path = env::var("MENU_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let menu_utc_offset_hours = env_parse("MENU_UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS)?;

        let config = Self {
            telegram,
            llm,
            log_file,
            window,
            menu_catalog_path,
            menu_utc_offset_hours,
        };
        config.utc_offset()?;
        Ok(config)
    }

    /// Offset used to render `{time}` in menu texts.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        if !(-12..=14).contains(&self.menu_utc_offset_hours) {
            return Err(BotError::Config(format!(
                "MENU_UTC_OFFSET_HOURS out of range: {}",
                self.menu_utc_offset_hours
            )));
        }
        FixedOffset::east_opt(self.menu_utc_offset_hours * 3600).ok_or_else(|| {
            BotError::Config(format!(
                "Invalid MENU_UTC_OFFSET_HOURS: {}",
                self.menu_utc_offset_hours
            ))
        })
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(s) => s
            .trim()
            .parse()
            .map_err(|_| BotError::Config(format!("{} is not a valid number: {}", key, s))),
        Err(_) => Ok(default),
    }
}

fn env_secs(key: &str, default: Duration) -> Result<Duration> {
    env_parse(key, default.as_secs()).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 19] = [
        "BOT_TOKEN",
        "TELEGRAM_BOT_TOKEN",
        "TELEGRAM_API_URL",
        "TELOXIDE_API_URL",
        "TELEGRAM_TIMEOUT_SECS",
        "OPENAI_API_KEY",
        "GIGACHAT_API_KEY",
        "OPENAI_BASE_URL",
        "MODEL",
        "AI_MODEL",
        "LLM_TEMPERATURE",
        "LLM_TIMEOUT_SECS",
        "LLM_SYSTEM_PROMPT",
        "LOG_FILE",
        "WINDOW_TTL_SECS",
        "WINDOW_MAX_USERS",
        "WINDOW_SWEEP_INTERVAL_SECS",
        "MENU_CATALOG_PATH",
        "MENU_UTC_OFFSET_HOURS",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
        env::remove_var("SYSTEM_PROMPT");
    }

    fn set_required() {
        env::set_var("BOT_TOKEN", "123:abc");
        env::set_var("OPENAI_API_KEY", "sk-test-key-1234567890");
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        clear_env();
        set_required();

        let config = BotConfig::load(None).unwrap();

        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.llm.api_key, "sk-test-key-1234567890");
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert_eq!(config.window.ttl, Duration::from_secs(172_800));
        assert_eq!(config.window.max_users, 10_000);
        assert_eq!(config.window.sweep_interval, Duration::from_secs(600));
        assert!(config.menu_catalog_path.is_none());
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 7 * 3600);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_overrides() {
        clear_env();
        set_required();
        env::set_var("WINDOW_TTL_SECS", "3600");
        env::set_var("WINDOW_MAX_USERS", "50");
        env::set_var("MENU_CATALOG_PATH", "/etc/conductor/menu.json");
        env::set_var("MENU_UTC_OFFSET_HOURS", "3");
        env::set_var("LOG_FILE", "/tmp/bot.log");

        let config = BotConfig::load(Some("999:override".to_string())).unwrap();

        assert_eq!(config.telegram.bot_token, "999:override");
        assert_eq!(config.window.ttl, Duration::from_secs(3600));
        assert_eq!(config.window.max_users, 50);
        assert_eq!(
            config.menu_catalog_path,
            Some(PathBuf::from("/etc/conductor/menu.json"))
        );
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(config.log_file, "/tmp/bot.log");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_token_is_config_error() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "sk-test-key-1234567890");
        assert!(matches!(BotConfig::load(None), Err(BotError::Config(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_llm_key_is_config_error() {
        clear_env();
        env::set_var("BOT_TOKEN", "123:abc");
        let err = BotConfig::load(None).unwrap_err();
        assert!(matches!(err, BotError::Config(ref m) if m.contains("OPENAI_API_KEY")));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_malformed_numbers_are_config_errors() {
        for (key, value) in [
            ("WINDOW_TTL_SECS", "two days"),
            ("WINDOW_MAX_USERS", "0"),
            ("MENU_UTC_OFFSET_HOURS", "20"),
        ] {
            clear_env();
            set_required();
            env::set_var(key, value);
            assert!(
                matches!(BotConfig::load(None), Err(BotError::Config(_))),
                "{}={} should be rejected",
                key,
                value
            );
        }
        clear_env();
    }
}
