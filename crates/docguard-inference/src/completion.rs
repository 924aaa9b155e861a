//! HTTP completion backend (OpenAI-compatible chat completions).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docguard_core::{CompletionBackend, CompletionOptions, Error, Result};

/// Default completion endpoint base URL.
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1";

/// Configuration for the HTTP completion backend.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// API key; None for unauthenticated local gateways.
    pub api_key: Option<String>,
    /// Default model slug.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMPLETION_URL.to_string(),
            api_key: None,
            model: docguard_core::defaults::COMPLETION_MODEL.to_string(),
            timeout_secs: docguard_core::defaults::COMPLETION_TIMEOUT_SECS,
        }
    }
}

impl CompletionConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DOCGUARD_COMPLETION_URL` | `https://api.openai.com/v1` |
    /// | `DOCGUARD_COMPLETION_API_KEY` | none |
    /// | `DOCGUARD_COMPLETION_MODEL` | `gpt-4o-mini` |
    /// | `DOCGUARD_COMPLETION_TIMEOUT_SECS` | `60` |
    pub fn from_env() -> Self {
        let base_url = std::env::var("DOCGUARD_COMPLETION_URL")
            .unwrap_or_else(|_| DEFAULT_COMPLETION_URL.to_string());
        let api_key = std::env::var("DOCGUARD_COMPLETION_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        let model = std::env::var("DOCGUARD_COMPLETION_MODEL")
            .unwrap_or_else(|_| docguard_core::defaults::COMPLETION_MODEL.to_string());
        let timeout_secs = std::env::var("DOCGUARD_COMPLETION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(docguard_core::defaults::COMPLETION_TIMEOUT_SECS);

        Self {
            base_url,
            api_key,
            model,
            timeout_secs,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Completion backend over an OpenAI-compatible chat-completions API.
pub struct HttpCompletionBackend {
    client: Client,
    config: CompletionConfig,
}

impl HttpCompletionBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: CompletionConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initializing completion backend"
        );

        Self { client, config }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(CompletionConfig::from_env())
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        opts: &CompletionOptions,
    ) -> Result<String> {
        let model = opts.model.as_deref().unwrap_or(&self.config.model);
        let request = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model, prompt_len = prompt.len(), "sending completion request");

        let mut req = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Completion(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Completion(format!(
                "completion service returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("invalid response body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Completion("response contained no choices".to_string()))?;

        debug!(response_len = content.len(), "completion response received");
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = CompletionConfig::default();
        assert_eq!(config.base_url, DEFAULT_COMPLETION_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.model, docguard_core::defaults::COMPLETION_MODEL);
        assert_eq!(
            config.timeout_secs,
            docguard_core::defaults::COMPLETION_TIMEOUT_SECS
        );
    }

    #[test]
    fn chat_request_serializes_messages_in_order() {
        let request = ChatCompletionRequest {
            model: "test-model",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            temperature: 0.2,
            max_tokens: 128,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 128);
    }

    #[test]
    fn chat_response_deserializes() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "{}"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "{}");
    }
}
