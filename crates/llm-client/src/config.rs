//! LLM configuration loaded from the environment.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::openai_llm::DEFAULT_MODEL;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub system_prompt: Option<String>,
}

impl EnvLlmConfig {
    /// Loads from env. `OPENAI_API_KEY` (or `GIGACHAT_API_KEY`) is required; the rest default.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .or_else(|_| env::var("GIGACHAT_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
            .context("OPENAI_API_KEY (or GIGACHAT_API_KEY) not set")?;
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("MODEL")
            .or_else(|_| env::var("AI_MODEL"))
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = match env::var("LLM_TEMPERATURE") {
            Ok(s) => s
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .with_context(|| format!("LLM_TEMPERATURE must be a number in 0..=2, got {}", s))?,
            Err(_) => DEFAULT_TEMPERATURE,
        };
        let timeout = match env::var("LLM_TIMEOUT_SECS") {
            Ok(s) => Duration::from_secs(
                s.trim()
                    .parse()
                    .with_context(|| format!("LLM_TIMEOUT_SECS is not a number: {}", s))?,
            ),
            Err(_) => DEFAULT_TIMEOUT,
        };
        let system_prompt = env::var("LLM_SYSTEM_PROMPT")
            .or_else(|_| env::var("SYSTEM_PROMPT"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
            timeout,
            system_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "OPENAI_API_KEY",
            "GIGACHAT_API_KEY",
            "OPENAI_BASE_URL",
            "MODEL",
            "AI_MODEL",
            "LLM_TEMPERATURE",
            "LLM_TIMEOUT_SECS",
            "LLM_SYSTEM_PROMPT",
            "SYSTEM_PROMPT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "test_key");

        let config = EnvLlmConfig::from_env().unwrap();

        assert_eq!(config.api_key, "test_key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.system_prompt.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_gigachat_fallbacks() {
        clear_env();
        env::set_var("GIGACHAT_API_KEY", "giga_key");
        env::set_var("AI_MODEL", "GigaChat");
        env::set_var("LLM_TEMPERATURE", "0.1");
        env::set_var("LLM_TIMEOUT_SECS", "10");
        env::set_var("SYSTEM_PROMPT", "Ты - AI Проводник.");

        let config = EnvLlmConfig::from_env().unwrap();

        assert_eq!(config.api_key, "giga_key");
        assert_eq!(config.model, "GigaChat");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.system_prompt.as_deref(), Some("Ты - AI Проводник."));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_key_or_bad_numbers() {
        clear_env();
        assert!(EnvLlmConfig::from_env().is_err());

        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("LLM_TEMPERATURE", "hot");
        assert!(EnvLlmConfig::from_env().is_err());

        env::set_var("LLM_TEMPERATURE", "3.5");
        assert!(EnvLlmConfig::from_env().is_err());

        env::remove_var("LLM_TEMPERATURE");
        env::set_var("LLM_TIMEOUT_SECS", "-1");
        assert!(EnvLlmConfig::from_env().is_err());
        clear_env();
    }
}
