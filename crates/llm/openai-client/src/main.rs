//! Connectivity check for the configured LLM endpoint: sends one short prompt and prints the reply.
//! Reads `OPENAI_API_KEY` (or `GIGACHAT_API_KEY`), `OPENAI_BASE_URL` and `MODEL` from env / `.env`.

use openai_client::{
    mask_token, ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, OpenAIClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY")
        .or_else(|_| std::env::var("GIGACHAT_API_KEY"))
        .unwrap_or_default();
    if api_key.len() < 20 {
        anyhow::bail!("OPENAI_API_KEY / GIGACHAT_API_KEY is not set or too short");
    }
    println!("API key: {}", mask_token(&api_key));

    let client = match std::env::var("OPENAI_BASE_URL") {
        Ok(base_url) => OpenAIClient::with_base_url(api_key, base_url),
        Err(_) => OpenAIClient::new(api_key),
    };
    let model = std::env::var("MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());

    let messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content("Отвечай одним словом: ПРИВЕТ.")
            .build()?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content("Скажи 'привет'.")
            .build()?
            .into(),
    ];

    let response = client.chat_completion(&model, messages, Some(0.1)).await?;
    println!("OK: {}", response);

    Ok(())
}
