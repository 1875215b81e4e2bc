//! Base provider trait and common types for HealthChat
//!
//! This module defines the Provider trait that every assistant-response
//! provider implements, along with the request and response types exchanged
//! between the chat session controller and a provider.

use crate::category::ChatCategory;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message structure sent to a provider
///
/// This is the provider-facing shape of a conversation turn. Session-side
/// messages carry ids, timestamps, and reactions; providers only see role and
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::providers::Message;
    ///
    /// let msg = Message::user("Is honey safe?");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// One logical request for an assistant reply
///
/// Carries everything a provider needs: the category the user had selected
/// when sending, the system prompt derived from category and profile, the
/// prior conversation, and the new user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Category active when the message was sent
    pub category: ChatCategory,
    /// System prompt for this request
    pub system_prompt: String,
    /// Prior conversation, oldest first
    pub history: Vec<Message>,
    /// The new user text
    pub prompt: String,
}

impl ChatRequest {
    /// Create a new request
    pub fn new(
        category: ChatCategory,
        system_prompt: impl Into<String>,
        history: Vec<Message>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            category,
            system_prompt: system_prompt.into(),
            history,
            prompt: prompt.into(),
        }
    }

    /// Flatten into the message sequence chat-style APIs expect
    ///
    /// The system prompt comes first (when non-empty), then history, then the
    /// new user message.
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::category::ChatCategory;
    /// use healthchat::providers::{ChatRequest, Message};
    ///
    /// let request = ChatRequest::new(
    ///     ChatCategory::General,
    ///     "You are helpful",
    ///     vec![Message::user("Hi"), Message::assistant("Hello!")],
    ///     "Is honey safe?",
    /// );
    /// let messages = request.to_messages();
    /// assert_eq!(messages.len(), 4);
    /// assert_eq!(messages[0].role, "system");
    /// assert_eq!(messages[3].content, "Is honey safe?");
    /// ```
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        if !self.system_prompt.is_empty() {
            messages.push(Message::system(self.system_prompt.clone()));
        }
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(self.prompt.clone()));
        messages
    }
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use healthchat::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Completion response with message and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message from the assistant
    pub message: Message,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(message: Message, usage: TokenUsage) -> Self {
        Self {
            message,
            usage: Some(usage),
        }
    }
}

/// Provider trait for assistant-response providers
///
/// The chat session controller issues exactly one `complete` call per sent
/// message. Transport and wire format are entirely the provider's business;
/// the controller only consumes success or failure.
///
/// # Examples
///
/// ```no_run
/// use healthchat::providers::{ChatRequest, CompletionResponse, Message, Provider};
/// use healthchat::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn complete(&self, request: &ChatRequest) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::new(Message::assistant(request.prompt.clone())))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider name used in logs and status output
    fn name(&self) -> &str;

    /// Produce an assistant reply for the given request
    ///
    /// # Errors
    ///
    /// Returns error if the call fails or the response cannot be parsed
    async fn complete(&self, request: &ChatRequest) -> Result<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("a").role, "user");
        assert_eq!(Message::assistant("b").role, "assistant");
        assert_eq!(Message::system("c").role, "system");
    }

    #[test]
    fn test_to_messages_skips_empty_system_prompt() {
        let request = ChatRequest::new(ChatCategory::Sleep, "", Vec::new(), "How long?");
        let messages = request.to_messages();
        assert_eq!(messages, vec![Message::user("How long?")]);
    }

    #[test]
    fn test_to_messages_order() {
        let request = ChatRequest::new(
            ChatCategory::Nutrition,
            "system",
            vec![Message::user("first"), Message::assistant("reply")],
            "second",
        );
        let roles: Vec<_> = request
            .to_messages()
            .into_iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    }

    #[test]
    fn test_completion_response_with_usage() {
        let response =
            CompletionResponse::with_usage(Message::assistant("ok"), TokenUsage::new(10, 5));
        assert_eq!(response.usage.unwrap().total_tokens, 15);
        assert!(CompletionResponse::new(Message::assistant("ok"))
            .usage
            .is_none());
    }
}
