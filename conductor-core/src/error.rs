use thiserror::Error;

/// Closed error taxonomy. Only `Config` may terminate the process; every other variant is
/// recovered at the boundary of the turn that produced it.
#[derive(Error, Debug)]
pub enum BotError {
    /// A required credential or setting is missing or malformed at startup.
    #[error("Config error: {0}")]
    Config(String),

    /// The messaging transport rejected or timed out a request (send, delete, typing).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The LLM completion call failed, timed out, or returned an unusable payload.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A button callback carried an identifier the menu catalog does not know.
    #[error("Unknown button: {0}")]
    UnknownButton(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
