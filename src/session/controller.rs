//! Chat session controller
//!
//! [`ChatController`] owns the message log, loading flag, last error, and
//! active category of one chat. It is a cheap `Clone` handle: all clones share
//! the same state, so a renderer can hold one while the input loop awaits
//! `send_message` on another.
//!
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`. Every mutation republishes a [`ChatSnapshot`] on a
//! `tokio::sync::watch` channel.

use crate::category::ChatCategory;
use crate::config::ChatConfig;
use crate::error::{HealthChatError, Result};
use crate::profile::HealthProfile;
use crate::prompts::build_system_prompt;
use crate::providers::{ChatRequest, Provider};
use crate::session::message::{ChatMessage, Reaction};
use crate::session::state::{
    ChatSnapshot, ChatState, FailureReason, ResponseFailure, SendOutcome,
};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

/// Handle to one active chat session
#[derive(Clone)]
pub struct ChatController {
    provider: Arc<dyn Provider>,
    profile: Arc<HealthProfile>,
    settings: ChatConfig,
    state: Arc<Mutex<ChatState>>,
    updates: Arc<watch::Sender<ChatSnapshot>>,
}

impl std::fmt::Debug for ChatController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("provider", &self.provider.name())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl ChatController {
    /// Create a controller with an empty log
    ///
    /// # Arguments
    ///
    /// * `provider` - Assistant-response provider
    /// * `profile` - The submitted (frozen) health profile
    /// * `settings` - Chat settings (initial category, timeout, history window)
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use healthchat::config::ChatConfig;
    /// use healthchat::profile::HealthProfile;
    /// use healthchat::providers::fake::ScriptedProvider;
    /// use healthchat::session::ChatController;
    ///
    /// let provider = Arc::new(ScriptedProvider::new(Vec::new()));
    /// let controller = ChatController::new(provider, HealthProfile::new(), ChatConfig::default());
    /// assert!(controller.messages().is_empty());
    /// assert!(!controller.is_loading());
    /// ```
    pub fn new(provider: Arc<dyn Provider>, profile: HealthProfile, settings: ChatConfig) -> Self {
        let state = ChatState::new(settings.default_category);
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            provider,
            profile: Arc::new(profile),
            settings,
            state: Arc::new(Mutex::new(state)),
            updates: Arc::new(updates),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChatState>> {
        self.state
            .lock()
            .map_err(|e| HealthChatError::Session(format!("state lock poisoned: {}", e)).into())
    }

    fn publish(&self, state: &ChatState) {
        self.updates.send_replace(state.snapshot());
    }

    /// Send a user message and wait for the assistant's reply
    ///
    /// The user message is appended and loading is set before the provider is
    /// called, so observers see it immediately. Provider failures never
    /// propagate: they become the session error and are returned as
    /// [`SendOutcome::Failed`]. Dropping the returned future before it
    /// completes clears the loading flag and keeps the user message.
    ///
    /// # Errors
    ///
    /// Rejects the call without touching state when the text is blank
    /// (`EmptyMessage`), a response is already pending (`SendInProgress`), or
    /// the controller was closed (`SessionClosed`).
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let text = text.trim();

        let (request, generation) = {
            let mut state = self.lock()?;

            if state.closed {
                tracing::warn!("Rejected send on closed session");
                return Err(HealthChatError::SessionClosed.into());
            }
            if text.is_empty() {
                return Err(HealthChatError::EmptyMessage.into());
            }
            if state.is_loading {
                tracing::warn!("Rejected send while a response is pending");
                return Err(HealthChatError::SendInProgress.into());
            }

            let window = self.settings.max_history_messages;
            let skip = state.messages.len().saturating_sub(window);
            let history = state.messages[skip..]
                .iter()
                .map(ChatMessage::to_provider_message)
                .collect();

            let request = ChatRequest::new(
                state.category,
                build_system_prompt(state.category, &self.profile),
                history,
                text,
            );

            state.messages.push(ChatMessage::user(text));
            state.is_loading = true;
            state.error = None;
            self.publish(&state);

            (request, state.generation)
        };

        let mut pending = PendingSend {
            controller: self,
            generation,
            armed: true,
        };

        tracing::debug!(
            category = %request.category,
            history = request.history.len(),
            "Dispatching message to provider {}",
            self.provider.name()
        );

        let timeout = self.settings.request_timeout_seconds;
        let result = match tokio::time::timeout(
            Duration::from_secs(timeout),
            self.provider.complete(&request),
        )
        .await
        {
            Ok(Ok(response)) if response.message.content.trim().is_empty() => {
                Err(ResponseFailure::new(
                    FailureReason::InvalidResponse,
                    "Assistant returned an empty reply",
                ))
            }
            Ok(Ok(response)) => Ok(response.message.content),
            Ok(Err(e)) => Err(ResponseFailure::from_error(&e)),
            Err(_) => Err(ResponseFailure::from_error(&anyhow::Error::new(
                HealthChatError::Timeout { seconds: timeout },
            ))),
        };

        pending.armed = false;
        let mut state = self.lock()?;

        if state.closed || state.generation != generation {
            tracing::debug!("Discarding response for a cleared or closed session");
            return Ok(SendOutcome::Discarded);
        }

        state.is_loading = false;
        let outcome = match result {
            Ok(content) => {
                let reply = ChatMessage::assistant(content);
                let id = reply.id;
                state.messages.push(reply);
                SendOutcome::Replied(id)
            }
            Err(failure) => {
                tracing::warn!(reason = %failure.reason, "Response failed: {}", failure.detail);
                state.error = Some(failure.clone());
                SendOutcome::Failed(failure)
            }
        };
        self.publish(&state);

        Ok(outcome)
    }

    /// Replace the category used by future sends
    pub fn set_category(&self, category: ChatCategory) {
        if let Ok(mut state) = self.lock() {
            if state.category != category {
                tracing::info!("Category changed: {} -> {}", state.category, category);
            }
            state.category = category;
            self.publish(&state);
        }
    }

    /// Set the reaction on the message with `id`
    ///
    /// Overwrites any previous reaction. Returns `false`, changing nothing,
    /// when no message has that id.
    pub fn react(&self, id: Uuid, reaction: Reaction) -> bool {
        let Ok(mut state) = self.lock() else {
            return false;
        };
        match state.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.reaction = Some(reaction);
                self.publish(&state);
                true
            }
            None => {
                tracing::debug!(%id, "Reaction target not found");
                false
            }
        }
    }

    /// Empty the log and reset loading and error
    ///
    /// A response still in flight is discarded when it arrives.
    pub fn clear(&self) {
        if let Ok(mut state) = self.lock() {
            state.messages.clear();
            state.is_loading = false;
            state.error = None;
            state.generation += 1;
            self.publish(&state);
            tracing::info!("Chat session cleared");
        }
    }

    /// Tear the controller down
    ///
    /// Later sends fail with `SessionClosed`, and a response still in flight is
    /// discarded when it arrives.
    pub fn close(&self) {
        if let Ok(mut state) = self.lock() {
            if state.closed {
                return;
            }
            state.closed = true;
            state.is_loading = false;
            state.generation += 1;
            self.publish(&state);
            tracing::info!("Chat session closed");
        }
    }

    /// Copy of the message log
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state
            .lock()
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Whether a response is pending
    pub fn is_loading(&self) -> bool {
        self.state.lock().map(|s| s.is_loading).unwrap_or(false)
    }

    /// Failure of the most recent send, if any
    pub fn error(&self) -> Option<ResponseFailure> {
        self.state.lock().ok().and_then(|s| s.error.clone())
    }

    /// Category used for the next send
    pub fn category(&self) -> ChatCategory {
        self.state
            .lock()
            .map(|s| s.category)
            .unwrap_or_default()
    }

    /// Whether [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.state.lock().map(|s| s.closed).unwrap_or(true)
    }

    /// The frozen profile this session was started with
    pub fn profile(&self) -> &HealthProfile {
        &self.profile
    }

    /// Name of the provider answering this session
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current state as one immutable value
    pub fn snapshot(&self) -> ChatSnapshot {
        self.state
            .lock()
            .map(|s| s.snapshot())
            .unwrap_or_default()
    }

    /// Receive a snapshot after every mutation
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.updates.subscribe()
    }
}

/// Clears the loading flag when a send is dropped before its response lands
struct PendingSend<'a> {
    controller: &'a ChatController,
    generation: u64,
    armed: bool,
}

impl Drop for PendingSend<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut state) = self.controller.lock() {
            if state.closed || state.generation != self.generation || !state.is_loading {
                return;
            }
            state.is_loading = false;
            self.controller.publish(&state);
            tracing::debug!("Send abandoned before the response arrived");
        }
    }
}
