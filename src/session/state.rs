//! Session state, snapshots, and response failures

use crate::category::ChatCategory;
use crate::error::HealthChatError;
use crate::session::message::ChatMessage;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a send did not produce an assistant message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Transport or HTTP failure while talking to the provider
    Provider,
    /// The provider answered with something unusable
    InvalidResponse,
    /// The provider did not answer within the configured timeout
    Timeout,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Provider => write!(f, "provider"),
            FailureReason::InvalidResponse => write!(f, "invalid_response"),
            FailureReason::Timeout => write!(f, "timeout"),
        }
    }
}

/// The session error value shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFailure {
    /// Failure class
    pub reason: FailureReason,
    /// Human-readable cause
    pub detail: String,
}

impl ResponseFailure {
    /// Create a failure
    pub fn new(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    /// Classify a provider error
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::error::HealthChatError;
    /// use healthchat::session::{FailureReason, ResponseFailure};
    ///
    /// let err = anyhow::Error::new(HealthChatError::Timeout { seconds: 5 });
    /// assert_eq!(ResponseFailure::from_error(&err).reason, FailureReason::Timeout);
    /// ```
    pub fn from_error(error: &anyhow::Error) -> Self {
        let reason = match error.downcast_ref::<HealthChatError>() {
            Some(HealthChatError::Timeout { .. }) => FailureReason::Timeout,
            Some(HealthChatError::InvalidResponse(_))
            | Some(HealthChatError::Serialization(_)) => FailureReason::InvalidResponse,
            _ => FailureReason::Provider,
        };
        Self::new(reason, error.to_string())
    }
}

impl fmt::Display for ResponseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            FailureReason::Timeout => {
                write!(f, "The assistant took too long to respond: {}", self.detail)
            }
            _ => write!(f, "Failed to get a response: {}", self.detail),
        }
    }
}

/// Result of a completed `send_message` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The assistant message with this id was appended
    Replied(Uuid),
    /// The response failed and the session error was set
    Failed(ResponseFailure),
    /// The session was cleared or closed while the response was pending
    Discarded,
}

/// Immutable view of a chat session published to observers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSnapshot {
    /// Message log in send/receive order
    pub messages: Vec<ChatMessage>,
    /// True exactly while a response is pending
    pub is_loading: bool,
    /// Failure of the most recent send, if any
    pub error: Option<ResponseFailure>,
    /// Category used for the next send
    pub category: ChatCategory,
    /// Whether the controller has been closed
    pub closed: bool,
}

/// Mutable state owned by a controller
#[derive(Debug, Default)]
pub(crate) struct ChatState {
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<ResponseFailure>,
    pub(crate) category: ChatCategory,
    /// Advanced by `clear` and `close`; responses from older generations are dropped
    pub(crate) generation: u64,
    pub(crate) closed: bool,
}

impl ChatState {
    pub(crate) fn new(category: ChatCategory) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    pub(crate) fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            messages: self.messages.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            category: self.category,
            closed: self.closed,
        }
    }
}
