//! OpenAI-Compatible Client
//!
//! `TextGenerator` over any chat-completions endpoint (OpenAI, DeepSeek,
//! Ollama's `/v1` shim, vLLM, ...). Each prompt is sent as a single user
//! message; the first choice's content is returned.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http_client::build_http_client;
use super::provider::{missing_api_key_error, parse_http_error, TextGenerator};
use super::types::{LlmError, LlmResult, ProviderConfig};

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Chat-completions client
pub struct OpenAICompatibleClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAICompatibleClient {
    /// Create a new client with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy_url.as_deref())?;
        Ok(Self { config, client })
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// Hosted endpoints need a key; localhost servers usually don't.
    fn requires_api_key(&self) -> bool {
        let url = self.base_url();
        !(url.contains("localhost") || url.contains("127.0.0.1"))
    }

    /// Build the request body for the API
    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": false,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAICompatibleClient {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let api_key = match self.config.api_key.as_ref() {
            Some(key) => Some(key),
            None if self.requires_api_key() => return Err(missing_api_key_error("openai")),
            None => None,
        };

        let body = self.build_request_body(prompt);
        debug!(model = %self.config.model, prompt_len = prompt.len(), "Sending completion request");

        let mut request = self
            .client
            .post(self.base_url())
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, "openai"));
        }

        extract_text(&body_text)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Pull the first choice's text out of a chat-completions response body.
pub fn extract_text(body: &str) -> LlmResult<String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ParseError {
            message: format!("Failed to parse response: {}", e),
        })?;

    parsed
        .choices
        .into_iter()
        .find_map(|c| c.message.and_then(|m| m.content))
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}
