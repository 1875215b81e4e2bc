//! Provider module for HealthChat
//!
//! This module contains the assistant-response provider abstraction and
//! implementations for Ollama and OpenAI-compatible servers, plus a scripted
//! in-process provider for tests.

pub mod base;
pub mod fake;
pub mod ollama;
pub mod openai;

pub use base::{ChatRequest, CompletionResponse, Message, Provider, TokenUsage};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::config::ProviderConfig;
use crate::error::{HealthChatError, Result};
use std::sync::Arc;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("ollama" or "openai")
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a shared provider instance
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
///
/// # Examples
///
/// ```
/// use healthchat::config::ProviderConfig;
/// use healthchat::providers::create_provider;
///
/// let provider = create_provider("ollama", &ProviderConfig::default()).unwrap();
/// assert_eq!(provider.name(), "ollama");
/// assert!(create_provider("unknown", &ProviderConfig::default()).is_err());
/// ```
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    match provider_type {
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.ollama.clone())?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.openai.clone())?)),
        _ => Err(
            HealthChatError::Provider(format!("Unknown provider type: {}", provider_type)).into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_invalid_type() {
        let result = create_provider("invalid", &ProviderConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_create_provider_ollama() {
        let provider = create_provider("ollama", &ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_create_provider_openai() {
        let provider = create_provider("openai", &ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
