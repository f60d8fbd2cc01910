use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during completion requests
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("No API key configured (set {0} or llm.api_key)")]
    MissingApiKey(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Trait for clients that turn a task description into shell commands
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Ask for commands for `task`; the raw reply is newline-separated commands
    async fn suggest(&self, task: &str) -> Result<String, LLMError>;
}
