//! OpenAI-compatible [`LlmClient`]: wraps openai-client and sends `[system, user]` messages.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use tracing::instrument;

use super::LlmClient;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::new(api_key),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Builds the two-message request body.
fn build_messages(
    system_preamble: &str,
    question: &str,
) -> Result<Vec<ChatCompletionRequestMessage>> {
    Ok(vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_preamble.to_string())
            .build()?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(question.to_string())
            .build()?
            .into(),
    ])
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, system_preamble, question), fields(model = %self.model))]
    async fn create_completion(
        &self,
        system_preamble: &str,
        question: &str,
        temperature: f32,
    ) -> Result<String> {
        let messages = build_messages(system_preamble, question)?;
        self.client
            .chat_completion(&self.model, messages, Some(temperature))
            .await
    }
}
