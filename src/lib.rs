//! HealthChat - health advice chat library
//!
//! This library provides a UI-agnostic health chat session: profile intake
//! gating, a chat session controller with category context, reactions, and
//! error surfacing, plus assistant-response providers and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Session gate and chat session controller
//! - `providers`: Provider abstraction and implementations (Ollama, OpenAI-compatible)
//! - `prompts`: System prompt construction from category and profile
//! - `profile`: Health profile data and input validation
//! - `category`: Topic categories
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Terminal host
//!
//! # Example
//!
//! ```no_run
//! use healthchat::profile::ProfileField;
//! use healthchat::providers::create_provider;
//! use healthchat::{Config, SessionGate};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider.provider_type, &config.provider)?;
//!     let mut gate = SessionGate::new(provider, config.chat.clone());
//!     gate.update_field(ProfileField::Name, "Ana")?;
//!     gate.update_field(ProfileField::Age, "30")?;
//!     gate.update_field(ProfileField::Height, "165")?;
//!     gate.update_field(ProfileField::Weight, "60")?;
//!
//!     let controller = gate.submit_profile()?.clone();
//!     controller.send_message("Is honey safe?").await?;
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod profile;
pub mod prompts;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use category::ChatCategory;
pub use config::Config;
pub use error::{HealthChatError, Result};
pub use profile::{HealthProfile, ProfileField};
pub use session::{ChatController, SessionGate};

#[cfg(test)]
pub mod test_utils;
