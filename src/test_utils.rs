//! Test utilities for HealthChat
//!
//! This module provides common test fixtures: temporary files, a complete
//! health profile, chat settings, and assertion helpers.

use crate::config::{ChatConfig, Config};
use crate::profile::{HealthProfile, ProfileField};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error's message contains the expected text
///
/// # Panics
///
/// Panics if the error doesn't contain the expected message
pub fn assert_error_contains(error: &anyhow::Error, expected: &str) {
    let error_msg = error.to_string();
    assert!(
        error_msg.contains(expected),
        "Error message '{}' does not contain '{}'",
        error_msg,
        expected
    );
}

/// Create a test configuration with default values
pub fn test_config() -> Config {
    Config::default()
}

/// Chat settings with a short timeout
pub fn test_chat_config() -> ChatConfig {
    ChatConfig {
        request_timeout_seconds: 5,
        ..ChatConfig::default()
    }
}

/// A complete profile for "Ana"
pub fn test_profile() -> HealthProfile {
    let mut profile = HealthProfile::new();
    profile.set(ProfileField::Name, "Ana");
    profile.set(ProfileField::Age, "30");
    profile.set(ProfileField::Height, "165");
    profile.set(ProfileField::Weight, "60");
    profile
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
provider:
  type: openai
  ollama:
    host: http://localhost:11434
    model: llama3.2:latest
  openai:
    api_base: http://localhost:8080/v1
    model: local-model
    api_key_env: HEALTHCHAT_TEST_KEY

chat:
  default_category: nutrition
  request_timeout_seconds: 30
  max_history_messages: 10
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ChatCategory;
    use crate::error::HealthChatError;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "profile.yaml", "name: Ana");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name: Ana");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let err = anyhow::Error::new(HealthChatError::Config("test error message".to_string()));
        assert_error_contains(&err, "test error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let err = anyhow::Error::new(HealthChatError::Config("different error".to_string()));
        assert_error_contains(&err, "not present");
    }

    #[test]
    fn test_test_profile_is_valid() {
        assert!(test_profile().validate().is_ok());
    }

    #[test]
    fn test_test_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_test_config_yaml() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert_eq!(config.provider.provider_type, "openai");
        assert_eq!(config.chat.default_category, ChatCategory::Nutrition);
        assert!(config.validate().is_ok());
    }
}
