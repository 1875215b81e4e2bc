//! Configuration management for HealthChat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::category::ChatCategory;
use crate::error::{HealthChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for HealthChat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama, OpenAI-compatible)
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Chat session behavior
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which assistant-response provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI-compatible configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// OpenAI-compatible provider configuration
///
/// Works with any server exposing `/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL, without the `/chat/completions` suffix
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// Model to request
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    ///
    /// When the variable is unset no `Authorization` header is sent, which
    /// suits local servers.
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_api_base(),
            model: default_openai_model(),
            api_key_env: default_openai_api_key_env(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Category a new session starts in
    #[serde(default)]
    pub default_category: ChatCategory,

    /// Upper bound on a single provider call (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Number of prior messages sent along with each request
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,
}

fn default_request_timeout() -> u64 {
    60
}

fn default_max_history_messages() -> usize {
    20
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_category: ChatCategory::default(),
            request_timeout_seconds: default_request_timeout(),
            max_history_messages: default_max_history_messages(),
        }
    }
}

/// Providers accepted by `provider.type`
pub const VALID_PROVIDERS: [&str; 2] = ["ollama", "openai"];

const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 3600;

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration. A missing file is not an
    /// error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: impl AsRef<Path>, cli: &crate::cli::Cli) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Pick the configuration file to load
    ///
    /// An explicit path wins. Otherwise `config/config.yaml` in the working
    /// directory is used when present, then the platform config directory.
    pub fn resolve_path(explicit: Option<&str>) -> PathBuf {
        if let Some(path) = explicit {
            return PathBuf::from(path);
        }

        let local = PathBuf::from("config/config.yaml");
        if local.exists() {
            return local;
        }

        directories::ProjectDirs::from("", "", "healthchat")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .unwrap_or(local)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| HealthChatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| HealthChatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("HEALTHCHAT_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(host) = std::env::var("HEALTHCHAT_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("HEALTHCHAT_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(api_base) = std::env::var("HEALTHCHAT_OPENAI_API_BASE") {
            self.provider.openai.api_base = api_base;
        }

        if let Ok(model) = std::env::var("HEALTHCHAT_OPENAI_MODEL") {
            self.provider.openai.model = model;
        }

        if let Ok(category) = std::env::var("HEALTHCHAT_DEFAULT_CATEGORY") {
            match ChatCategory::parse_str(&category) {
                Ok(c) => {
                    self.chat.default_category = c;
                    tracing::debug!(category = %c, "Env override: HEALTHCHAT_DEFAULT_CATEGORY");
                }
                Err(_) => {
                    tracing::warn!("Invalid HEALTHCHAT_DEFAULT_CATEGORY: {}", category);
                }
            }
        }

        if let Ok(timeout) = std::env::var("HEALTHCHAT_REQUEST_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.chat.request_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid HEALTHCHAT_REQUEST_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(window) = std::env::var("HEALTHCHAT_MAX_HISTORY_MESSAGES") {
            if let Ok(value) = window.parse() {
                self.chat.max_history_messages = value;
            } else {
                tracing::warn!("Invalid HEALTHCHAT_MAX_HISTORY_MESSAGES: {}", window);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let crate::cli::Commands::Chat {
            provider, category, ..
        } = &cli.command
        {
            if let Some(p) = provider {
                self.provider.provider_type = p.clone();
            }
            if let Some(c) = category {
                match ChatCategory::parse_str(c) {
                    Ok(c) => self.chat.default_category = c,
                    Err(_) => tracing::warn!("Ignoring unknown --category {}", c),
                }
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(HealthChatError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(HealthChatError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        if self.chat.request_timeout_seconds == 0 {
            return Err(HealthChatError::Config(
                "chat.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.request_timeout_seconds > MAX_REQUEST_TIMEOUT_SECONDS {
            return Err(HealthChatError::Config(format!(
                "chat.request_timeout_seconds must be less than or equal to {}",
                MAX_REQUEST_TIMEOUT_SECONDS
            ))
            .into());
        }

        if self.chat.max_history_messages == 0 {
            return Err(HealthChatError::Config(
                "chat.max_history_messages must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
