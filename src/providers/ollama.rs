//! Ollama provider implementation for HealthChat
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server through its `/api/chat` endpoint.

use crate::config::OllamaConfig;
use crate::error::{HealthChatError, Result};
use crate::providers::{ChatRequest, CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Only connection setup is bounded here; the whole exchange is bounded by
/// `chat.request_timeout_seconds` in the session controller.
const CONNECT_TIMEOUT_SECONDS: u64 = 10;

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use healthchat::category::ChatCategory;
/// use healthchat::config::OllamaConfig;
/// use healthchat::providers::{ChatRequest, OllamaProvider, Provider};
///
/// # async fn example() -> healthchat::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default())?;
/// let request = ChatRequest::new(ChatCategory::General, "", Vec::new(), "Hello!");
/// let completion = provider.complete(&request).await?;
/// println!("{}", completion.message.content);
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

/// Message structure for Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
            .user_agent(concat!("healthchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                HealthChatError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn convert_messages(&self, messages: &[Message]) -> Vec<OllamaMessage> {
        messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.clone(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<CompletionResponse> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));

        let ollama_request = OllamaRequest {
            model: self.config.model.clone(),
            messages: self.convert_messages(&request.to_messages()),
            stream: false,
        };

        tracing::debug!(
            category = %request.category,
            "Sending Ollama request: {} messages",
            ollama_request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                HealthChatError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(HealthChatError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            HealthChatError::InvalidResponse(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        let message = Message::assistant(ollama_response.message.content);

        let response = if ollama_response.prompt_eval_count > 0 || ollama_response.eval_count > 0 {
            let usage = TokenUsage::new(
                ollama_response.prompt_eval_count,
                ollama_response.eval_count,
            );
            CompletionResponse::with_usage(message, usage)
        } else {
            CompletionResponse::new(message)
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OllamaProvider {
        OllamaProvider::new(OllamaConfig {
            host: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_ollama_provider_accessors() {
        let provider = provider();
        assert_eq!(provider.host(), "http://localhost:11434");
        assert_eq!(provider.model(), "llama3.2:latest");
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_convert_messages_keeps_roles_and_order() {
        let provider = provider();
        let messages = vec![
            Message::system("You are a health assistant"),
            Message::user("Hello"),
            Message::assistant("Hi there"),
        ];

        let converted = provider.convert_messages(&messages);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].content, "Hello");
        assert_eq!(converted[2].role, "assistant");
    }

    #[test]
    fn test_request_serialization() {
        let request = OllamaRequest {
            model: "llama3.2:latest".to_string(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: "Is honey safe?".to_string(),
            }],
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.2:latest");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["content"], "Is honey safe?");
    }

    #[test]
    fn test_response_deserialization_defaults() {
        let json = r#"{"message":{"role":"assistant","content":"Yes"}}"#;
        let response: OllamaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message.content, "Yes");
        assert!(!response.done);
        assert_eq!(response.eval_count, 0);
    }
}
