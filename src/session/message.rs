//! Chat log entries and reactions

use crate::error::HealthChatError;
use crate::providers::Message;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Author of a chat log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Typed by the user
    User,
    /// Produced by the assistant-response provider
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A user-attached tag on a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    /// The message was helpful
    ThumbsUp,
    /// The message was not helpful
    ThumbsDown,
}

impl Reaction {
    /// Parse a reaction tag
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::session::Reaction;
    ///
    /// assert_eq!(Reaction::parse_str("+1").unwrap(), Reaction::ThumbsUp);
    /// assert_eq!(Reaction::parse_str("Thumbs-Down").unwrap(), Reaction::ThumbsDown);
    /// assert!(Reaction::parse_str("meh").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, HealthChatError> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "thumbs_up" | "up" | "like" | "+1" | "helpful" => Ok(Self::ThumbsUp),
            "thumbs_down" | "down" | "dislike" | "_1" | "-1" | "not_helpful" | "unhelpful" => {
                Ok(Self::ThumbsDown)
            }
            _ => Err(HealthChatError::UnknownReaction(s.trim().to_string())),
        }
    }

    /// Short glyph for terminal rendering
    pub fn glyph(&self) -> &'static str {
        match self {
            Reaction::ThumbsUp => "+1",
            Reaction::ThumbsDown => "-1",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::ThumbsUp => write!(f, "thumbs_up"),
            Reaction::ThumbsDown => write!(f, "thumbs_down"),
        }
    }
}

impl FromStr for Reaction {
    type Err = HealthChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// One entry in a session's message log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique within the session
    pub id: Uuid,
    /// Author
    pub role: Role,
    /// Text content
    pub content: String,
    /// When the entry was appended
    pub timestamp: DateTime<Utc>,
    /// Reaction attached by the user, if any
    pub reaction: Option<Reaction>,
}

impl ChatMessage {
    /// New user entry with a fresh id and the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// New assistant entry with a fresh id and the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            reaction: None,
        }
    }

    /// Provider-facing form of this entry
    pub fn to_provider_message(&self) -> Message {
        match self.role {
            Role::User => Message::user(self.content.clone()),
            Role::Assistant => Message::assistant(self.content.clone()),
        }
    }

    /// Render for the terminal: `[HH:MM] You: ...` or `[HH:MM] Assistant: ...`
    pub fn render(&self) -> String {
        let time = self.timestamp.with_timezone(&chrono::Local).format("%H:%M");
        let speaker = match self.role {
            Role::User => "You".bold().cyan(),
            Role::Assistant => "Assistant".bold().green(),
        };
        let reaction = self
            .reaction
            .map(|r| format!(" [{}]", r.glyph()).dimmed().to_string())
            .unwrap_or_default();
        format!(
            "{} {}: {}{}",
            format!("[{}]", time).dimmed(),
            speaker,
            self.content,
            reaction
        )
    }
}
