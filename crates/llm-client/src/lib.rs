//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait (one system preamble + one user question → answer text) and an
//! OpenAI-compatible implementation. Object safe, so callers hold `Arc<dyn LlmClient>`.

use anyhow::Result;
use async_trait::async_trait;

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, DEFAULT_BASE_URL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
pub use openai_llm::OpenAILlmClient;

/// LLM completion interface.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply for `question` under the given system preamble.
    async fn create_completion(
        &self,
        system_preamble: &str,
        question: &str,
        temperature: f32,
    ) -> Result<String>;
}
