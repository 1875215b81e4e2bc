//! OpenAI-compatible provider implementation for HealthChat
//!
//! Talks to any server exposing the `/chat/completions` endpoint (OpenAI,
//! llama.cpp server, vLLM, LM Studio, ...). The API key is read from the
//! environment variable named in the configuration; when it is unset the
//! request is sent without an `Authorization` header.

use crate::config::OpenAiConfig;
use crate::error::{HealthChatError, Result};
use crate::providers::{ChatRequest, CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CONNECT_TIMEOUT_SECONDS: u64 = 10;

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompletionsRequest {
    model: String,
    messages: Vec<CompletionsMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompletionsMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<CompletionsChoice>,
    #[serde(default)]
    usage: Option<CompletionsUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionsChoice {
    message: CompletionsMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionsUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

impl OpenAiProvider {
    /// Create a new provider, reading the API key from the environment
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::with_api_key(config, api_key)
    }

    /// Create a new provider with an explicit API key
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn with_api_key(config: OpenAiConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
            .user_agent(concat!("healthchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                HealthChatError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        if api_key.is_none() {
            tracing::debug!(
                "No API key found in {}; sending unauthenticated requests",
                config.api_key_env
            );
        }

        tracing::info!(
            "Initialized OpenAI-compatible provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Full URL of the completions endpoint
    pub fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<CompletionResponse> {
        let body = CompletionsRequest {
            model: self.config.model.clone(),
            messages: request
                .to_messages()
                .into_iter()
                .map(|m| CompletionsMessage {
                    role: m.role,
                    content: Some(m.content),
                })
                .collect(),
            stream: false,
        };

        tracing::debug!(
            category = %request.category,
            "Sending completions request: {} messages",
            body.messages.len()
        );

        let mut builder = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Completions request failed: {}", e);
            HealthChatError::Provider(format!("Completions request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Completions endpoint returned {}: {}", status, error_text);
            return Err(HealthChatError::Provider(format!(
                "Completions endpoint returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: CompletionsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completions response: {}", e);
            HealthChatError::InvalidResponse(format!(
                "Failed to parse completions response: {}",
                e
            ))
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            HealthChatError::InvalidResponse("Response contained no choices".to_string())
        })?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());

        Ok(match parsed.usage {
            Some(usage) => CompletionResponse::with_usage(
                message,
                TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
            ),
            None => CompletionResponse::new(message),
        })
    }
}
