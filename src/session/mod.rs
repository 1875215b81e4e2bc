//! Chat session state machine
//!
//! [`SessionGate`] switches between profile intake and an active chat.
//! [`ChatController`] owns the conversation of one active chat.

pub mod controller;
pub mod gate;
pub mod message;
pub mod state;

pub use controller::ChatController;
pub use gate::{GateSnapshot, GateState, SessionGate};
pub use message::{ChatMessage, Reaction, Role};
pub use state::{ChatSnapshot, FailureReason, ResponseFailure, SendOutcome};
