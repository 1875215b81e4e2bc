//! Session gate: profile intake versus active chat
//!
//! The gate holds the health profile draft and decides whether the intake
//! form or the chat view is active. Submitting the profile mounts a fresh
//! [`ChatController`]; ending the session tears it down and resets the draft.

use crate::config::ChatConfig;
use crate::error::{HealthChatError, Result};
use crate::profile::{HealthProfile, ProfileField};
use crate::providers::Provider;
use crate::session::controller::ChatController;

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Which view the gate is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Collecting the health profile
    #[default]
    Intake,
    /// Chatting with a submitted profile
    Active,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Intake => write!(f, "intake"),
            GateState::Active => write!(f, "active"),
        }
    }
}

/// What gate observers receive after every change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateSnapshot {
    /// Which view is showing
    pub state: GateState,
    /// The draft, or the frozen profile while `Active`
    pub profile: HealthProfile,
}

/// Owner of one user's profile draft and chat controller
pub struct SessionGate {
    provider: Arc<dyn Provider>,
    settings: ChatConfig,
    draft: HealthProfile,
    controller: Option<ChatController>,
    updates: watch::Sender<GateSnapshot>,
}

impl SessionGate {
    /// Create a gate in `Intake` with an empty draft
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use healthchat::config::ChatConfig;
    /// use healthchat::providers::fake::ScriptedProvider;
    /// use healthchat::session::{GateState, SessionGate};
    ///
    /// let gate = SessionGate::new(Arc::new(ScriptedProvider::new(Vec::new())), ChatConfig::default());
    /// assert_eq!(gate.state(), GateState::Intake);
    /// assert!(gate.profile().is_empty());
    /// ```
    pub fn new(provider: Arc<dyn Provider>, settings: ChatConfig) -> Self {
        let (updates, _) = watch::channel(GateSnapshot::default());
        Self {
            provider,
            settings,
            draft: HealthProfile::default(),
            controller: None,
            updates,
        }
    }

    /// Current gate state
    pub fn state(&self) -> GateState {
        self.updates.borrow().state
    }

    /// The draft, or the frozen profile while `Active`
    pub fn profile(&self) -> &HealthProfile {
        &self.draft
    }

    /// The mounted controller, present only while `Active`
    pub fn controller(&self) -> Option<&ChatController> {
        self.controller.as_ref()
    }

    /// Receive the gate state and draft after every transition or edit
    pub fn subscribe(&self) -> watch::Receiver<GateSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self, state: GateState) {
        self.updates.send_replace(GateSnapshot {
            state,
            profile: self.draft.clone(),
        });
    }

    /// Merge a single field into the draft
    ///
    /// The value is stored as given; validation belongs to the input layer.
    ///
    /// # Errors
    ///
    /// Returns `ProfileLocked` while a chat is active.
    pub fn update_field(&mut self, field: ProfileField, value: impl Into<String>) -> Result<()> {
        if self.state() == GateState::Active {
            tracing::warn!(field = field.key(), "Rejected profile edit during active chat");
            return Err(HealthChatError::ProfileLocked.into());
        }
        self.draft.set(field, value);
        self.publish(GateState::Intake);
        Ok(())
    }

    /// Replace the whole draft, e.g. from a profile file
    ///
    /// # Errors
    ///
    /// Returns `ProfileLocked` while a chat is active.
    pub fn load_profile(&mut self, profile: HealthProfile) -> Result<()> {
        if self.state() == GateState::Active {
            return Err(HealthChatError::ProfileLocked.into());
        }
        self.draft = profile;
        self.publish(GateState::Intake);
        Ok(())
    }

    /// Freeze the draft and mount a fresh controller
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if a chat is already active.
    pub fn submit_profile(&mut self) -> Result<&ChatController> {
        if self.state() == GateState::Active {
            return Err(HealthChatError::InvalidTransition(
                "profile already submitted".to_string(),
            )
            .into());
        }

        let controller = ChatController::new(
            self.provider.clone(),
            self.draft.clone(),
            self.settings.clone(),
        );
        tracing::info!(
            provider = self.provider.name(),
            category = %controller.category(),
            "Profile submitted, chat session started"
        );
        self.publish(GateState::Active);
        Ok(&*self.controller.insert(controller))
    }

    /// Leave the chat, discard the controller, and reset the draft
    ///
    /// Any response still in flight for the old controller is discarded.
    /// From `Intake` this only resets the draft.
    pub fn end_session(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.close();
            tracing::info!("Chat session ended");
        }
        self.draft = HealthProfile::default();
        self.publish(GateState::Intake);
    }
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state())
            .field("draft", &self.draft)
            .field("controller", &self.controller)
            .finish()
    }
}
