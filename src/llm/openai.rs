use crate::config::LLMConfig;
use crate::llm::client::{LLMClient, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-5-nano";

/// Fixed instruction sent with every task
pub const SYSTEM_PROMPT: &str = "You are a Linux Ubuntu Server 24.04 LTS automation assistant. \
Return ONLY shell commands, one per line. \
Do not explain anything.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for OpenAI-compatible chat completion endpoints
pub struct OpenAIClient {
    api_key: String,
    model: String,
    endpoint: String,
    http_client: Client,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Result<Self, LLMError> {
        Self::with_options(
            api_key,
            DEFAULT_MODEL.to_string(),
            DEFAULT_ENDPOINT.to_string(),
            Duration::from_secs(60),
        )
    }

    pub fn with_options(
        api_key: String,
        model: String,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self, LLMError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Build a client from the `[llm]` config section
    pub fn from_config(config: &LLMConfig) -> Result<Self, LLMError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| LLMError::MissingApiKey(config.api_key_env.clone()))?;

        Self::with_options(
            api_key,
            config.model.clone(),
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    async fn call_api(&self, task: &str) -> Result<String, LLMError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: task,
                },
            ],
        };

        tracing::debug!(model = self.model.as_str(), url = %self.completions_url(), "requesting suggestions");

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LLMError::ApiError(format!(
                "API returned status {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        Self::extract_content(&body)
    }

    /// Pull the first choice's text out of a completion response body
    fn extract_content(body: &str) -> Result<String, LLMError> {
        let parsed: ChatResponse = serde_json::from_str(body)?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default().trim().to_string())
            .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn suggest(&self, task: &str) -> Result<String, LLMError> {
        self.call_api(task).await
    }
}
