//! In-process scripted provider for unit and integration tests
//!
//! [`ScriptedProvider`] answers requests from a queue of [`ScriptedReply`]
//! values and records every [`ChatRequest`] it receives. A gated provider
//! additionally holds each reply until the test calls
//! [`ReleaseHandle::release`], which lets tests observe a session while a
//! response is still in flight.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use healthchat::category::ChatCategory;
//! use healthchat::providers::fake::{ScriptedProvider, ScriptedReply};
//! use healthchat::providers::{ChatRequest, Provider};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = Arc::new(ScriptedProvider::new(vec![ScriptedReply::text("Yes")]));
//! let request = ChatRequest::new(ChatCategory::General, "", Vec::new(), "Is honey safe?");
//! let reply = provider.complete(&request).await.unwrap();
//! assert_eq!(reply.message.content, "Yes");
//! assert_eq!(provider.requests().len(), 1);
//! # }
//! ```

use crate::error::{HealthChatError, Result};
use crate::providers::{ChatRequest, CompletionResponse, Message, Provider};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// One scripted provider outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Reply with this assistant text
    Text(String),
    /// Fail with a provider error carrying this message
    Failure(String),
    /// Fail as if the provider returned an unusable payload
    Malformed(String),
    /// Succeed with empty assistant content
    Empty,
}

impl ScriptedReply {
    /// Shorthand for [`ScriptedReply::Text`]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Shorthand for [`ScriptedReply::Failure`]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// Releases held replies of a gated [`ScriptedProvider`]
#[derive(Debug, Clone)]
pub struct ReleaseHandle {
    permits: Arc<Semaphore>,
}

impl ReleaseHandle {
    /// Let one pending (or the next) request complete
    pub fn release(&self) {
        self.permits.add_permits(1);
    }
}

/// Provider that replays a fixed script
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedProvider {
    /// Provider that answers immediately from `replies`
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Provider that holds each reply until released
    pub fn gated(replies: impl IntoIterator<Item = ScriptedReply>) -> (Self, ReleaseHandle) {
        let permits = Arc::new(Semaphore::new(0));
        let provider = Self {
            gate: Some(permits.clone()),
            ..Self::new(replies)
        };
        (provider, ReleaseHandle { permits })
    }

    /// Queue another reply
    pub fn push(&self, reply: ScriptedReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<CompletionResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| HealthChatError::Provider(format!("Release gate closed: {}", e)))?;
            permit.forget();
        }

        let next = self
            .replies
            .lock()
            .map_err(|_| HealthChatError::Provider("Script lock poisoned".to_string()))?
            .pop_front();

        match next {
            Some(ScriptedReply::Text(content)) => {
                Ok(CompletionResponse::new(Message::assistant(content)))
            }
            Some(ScriptedReply::Failure(message)) => Err(HealthChatError::Provider(message).into()),
            Some(ScriptedReply::Malformed(message)) => {
                Err(HealthChatError::InvalidResponse(message).into())
            }
            Some(ScriptedReply::Empty) => Ok(CompletionResponse::new(Message::assistant(""))),
            None => Err(HealthChatError::Provider("Script exhausted".to_string()).into()),
        }
    }
}
