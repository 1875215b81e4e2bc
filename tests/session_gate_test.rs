mod common;

use common::{ana_profile, chat_config};

use healthchat::error::HealthChatError;
use healthchat::profile::{HealthProfile, ProfileField};
use healthchat::providers::fake::{ScriptedProvider, ScriptedReply};
use healthchat::session::{GateState, Role, SendOutcome, SessionGate};

use std::sync::Arc;

fn fill_ana(gate: &mut SessionGate) {
    for field in ProfileField::ALL {
        gate.update_field(field, ana_profile().get(field)).unwrap();
    }
}

#[test]
fn test_intake_to_active_with_empty_log() {
    let mut gate = SessionGate::new(Arc::new(ScriptedProvider::new(Vec::new())), chat_config(5));
    assert_eq!(gate.state(), GateState::Intake);

    fill_ana(&mut gate);
    let controller = gate.submit_profile().unwrap();

    assert!(controller.messages().is_empty());
    assert_eq!(controller.profile(), &ana_profile());
    assert_eq!(gate.state(), GateState::Active);
    assert_eq!(gate.profile(), &ana_profile());
}

#[test]
fn test_end_session_always_returns_to_empty_intake() {
    let mut gate = SessionGate::new(Arc::new(ScriptedProvider::new(Vec::new())), chat_config(5));

    gate.end_session();
    assert_eq!(gate.state(), GateState::Intake);
    assert_eq!(gate.profile(), &HealthProfile::default());

    fill_ana(&mut gate);
    gate.submit_profile().unwrap();
    gate.end_session();

    assert_eq!(gate.state(), GateState::Intake);
    assert!(gate.controller().is_none());
    for field in ProfileField::ALL {
        assert!(gate.profile().get(field).is_empty(), "{} not reset", field);
    }
}

#[test]
fn test_new_session_gets_fresh_controller() {
    let mut gate = SessionGate::new(
        Arc::new(ScriptedProvider::new(Vec::new())),
        chat_config(5),
    );
    fill_ana(&mut gate);
    let first = gate.submit_profile().unwrap().clone();
    gate.end_session();

    fill_ana(&mut gate);
    let second = gate.submit_profile().unwrap().clone();

    assert!(first.is_closed());
    assert!(!second.is_closed());
    assert!(second.messages().is_empty());
}

#[test]
fn test_profile_frozen_while_active() {
    let mut gate = SessionGate::new(Arc::new(ScriptedProvider::new(Vec::new())), chat_config(5));
    fill_ana(&mut gate);
    gate.submit_profile().unwrap();

    let err = gate.update_field(ProfileField::Weight, "70").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HealthChatError>(),
        Some(HealthChatError::ProfileLocked)
    ));

    let err = gate.submit_profile().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HealthChatError>(),
        Some(HealthChatError::InvalidTransition(_))
    ));
}

#[tokio::test]
async fn test_response_after_end_session_is_discarded() {
    let (provider, release) = ScriptedProvider::gated(vec![ScriptedReply::text("late reply")]);
    let mut gate = SessionGate::new(Arc::new(provider), chat_config(5));
    fill_ana(&mut gate);
    let controller = gate.submit_profile().unwrap().clone();
    let mut updates = controller.subscribe();

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.send_message("Is honey safe?").await })
    };
    updates.wait_for(|s| s.is_loading).await.unwrap();

    gate.end_session();
    release.release();

    let outcome = task.await.unwrap().unwrap();
    assert_eq!(outcome, SendOutcome::Discarded);
    assert!(controller
        .messages()
        .iter()
        .all(|m| m.role != Role::Assistant));
    assert!(!controller.is_loading());
    assert_eq!(gate.state(), GateState::Intake);
}
