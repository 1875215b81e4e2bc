use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use healthchat::config::ChatConfig;
use healthchat::profile::{HealthProfile, ProfileField};
use healthchat::providers::fake::{ReleaseHandle, ScriptedProvider, ScriptedReply};
use healthchat::session::ChatController;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn ana_profile() -> HealthProfile {
    let mut profile = HealthProfile::new();
    profile.set(ProfileField::Name, "Ana");
    profile.set(ProfileField::Age, "30");
    profile.set(ProfileField::Height, "165");
    profile.set(ProfileField::Weight, "60");
    profile
}

#[allow(dead_code)]
pub fn chat_config(timeout_seconds: u64) -> ChatConfig {
    ChatConfig {
        request_timeout_seconds: timeout_seconds,
        ..ChatConfig::default()
    }
}

/// Controller over a provider that answers immediately
#[allow(dead_code)]
pub fn scripted_controller(
    replies: Vec<ScriptedReply>,
) -> (ChatController, Arc<ScriptedProvider>) {
    let provider = Arc::new(ScriptedProvider::new(replies));
    let controller = ChatController::new(provider.clone(), ana_profile(), chat_config(5));
    (controller, provider)
}

/// Controller over a provider that holds each reply until released
#[allow(dead_code)]
pub fn gated_controller(
    replies: Vec<ScriptedReply>,
) -> (ChatController, Arc<ScriptedProvider>, ReleaseHandle) {
    let (provider, release) = ScriptedProvider::gated(replies);
    let provider = Arc::new(provider);
    let controller = ChatController::new(provider.clone(), ana_profile(), chat_config(5));
    (controller, provider, release)
}
