//! Error types for HealthChat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for HealthChat operations
///
/// This enum encompasses the errors that can occur while loading
/// configuration, collecting a health profile, driving a chat session,
/// and talking to an assistant-response provider.
#[derive(Error, Debug)]
pub enum HealthChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (transport, HTTP status, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider answered, but the answer could not be used
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider did not answer in time
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// The configured timeout that elapsed
        seconds: u64,
    },

    /// Required profile fields are empty
    #[error("Missing required profile fields: {}", .0.join(", "))]
    MissingProfileFields(Vec<String>),

    /// A profile field holds a value it cannot accept
    #[error("Invalid profile field {field}: {message}")]
    InvalidProfileField {
        /// Field label
        field: String,
        /// Why the value was rejected
        message: String,
    },

    /// Unknown profile field name
    #[error("Unknown profile field: {0}")]
    UnknownProfileField(String),

    /// The profile is frozen while a chat is active
    #[error("Profile cannot be edited while a chat session is active")]
    ProfileLocked,

    /// Session gate was asked for a transition it does not allow
    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    /// A message was sent while a response is still pending
    #[error("A response is already pending for this session")]
    SendInProgress,

    /// The message text was empty
    #[error("Message text cannot be empty")]
    EmptyMessage,

    /// The chat controller was torn down
    #[error("Chat session has been closed")]
    SessionClosed,

    /// Internal session state could not be accessed
    #[error("Session state error: {0}")]
    Session(String),

    /// Unknown chat category name
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Unknown reaction tag
    #[error("Unknown reaction: {0}")]
    UnknownReaction(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for HealthChat operations
///
/// Uses `anyhow::Error` so callers can attach context while typed
/// [`HealthChatError`] values stay reachable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
