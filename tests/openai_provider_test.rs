use serde_json::json;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use healthchat::category::ChatCategory;
use healthchat::config::OpenAiConfig;
use healthchat::error::HealthChatError;
use healthchat::providers::{ChatRequest, OpenAiProvider, Provider};
use healthchat::session::{ChatController, FailureReason, SendOutcome};

use std::sync::Arc;

mod common;

fn config_for(server: &MockServer) -> OpenAiConfig {
    OpenAiConfig {
        api_base: format!("{}/v1", server.uri()),
        model: "local-model".to_string(),
        ..Default::default()
    }
}

fn request() -> ChatRequest {
    ChatRequest::new(ChatCategory::Sleep, "", Vec::new(), "How long should I nap?")
}

#[tokio::test]
async fn test_completions_with_bearer_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "local-model",
            "stream": false,
            "messages": [{ "role": "user", "content": "How long should I nap?" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "About 20 minutes." },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        OpenAiProvider::with_api_key(config_for(&server), Some("sk-test".to_string())).unwrap();
    let response = provider.complete(&request()).await.unwrap();

    assert_eq!(response.message.content, "About 20 minutes.");
    assert_eq!(response.usage.unwrap().completion_tokens, 5);
}

#[tokio::test]
async fn test_completions_without_key_sends_no_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "ok" } }]
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::with_api_key(config_for(&server), None).unwrap();
    provider.complete(&request()).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0]
        .headers
        .keys()
        .all(|name| !name.to_string().eq_ignore_ascii_case("authorization")));
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::with_api_key(config_for(&server), None).unwrap();
    let err = provider.complete(&request()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<HealthChatError>(),
        Some(HealthChatError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_controller_surfaces_http_failure_as_session_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let provider = Arc::new(OpenAiProvider::with_api_key(config_for(&server), None).unwrap());
    let controller = ChatController::new(provider, common::ana_profile(), common::chat_config(5));

    let outcome = controller.send_message("Any tips?").await.unwrap();

    match outcome {
        SendOutcome::Failed(failure) => {
            assert_eq!(failure.reason, FailureReason::Provider);
            assert!(failure.detail.contains("rate limited"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(controller.messages().len(), 1);
    assert!(controller.error().is_some());
}
