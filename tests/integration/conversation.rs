//! Conversation store end-to-end tests
//!
//! The store talks to a live relay over HTTP, which talks to a mock Gemini.
//! Failure cases swap the relay for a stub that misbehaves once.

use std::sync::Arc;

use codemaster::{
    client::{ClientError, ConversationStore, Message, RelayClient, StoreState},
    prompt::SYSTEM_PROMPT,
    types::Credential,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::{
    client_config, constants::TEST_API_KEY, spawn_relay, unused_url, RecordingView,
};
use crate::mocks::{content_roles, last_turn_text, MockGemini};

async fn store_for(gemini: &MockGemini) -> ConversationStore<RecordingView> {
    let relay_url = format!("{}/generate", spawn_relay(&gemini.uri()).await);
    store_against(&relay_url)
}

#[tokio::test]
async fn test_two_turn_conversation() {
    let gemini = MockGemini::start().await;
    gemini.mock_generate_success_once("first answer").await;
    gemini.mock_generate_success("second answer").await;
    let mut store = store_for(&gemini).await;

    store.submit("Write a function to reverse a string").await.unwrap();
    store.submit("Now make it handle unicode").await.unwrap();

    assert_eq!(
        store.history(),
        &[
            Message::user("Write a function to reverse a string"),
            Message::assistant("first answer"),
            Message::user("Now make it handle unicode"),
            Message::assistant("second answer"),
        ]
    );
    assert_eq!(store.view().messages.len(), 4);
    assert!(store.view().errors.is_empty());

    let bodies = gemini.received_bodies().await;
    assert_eq!(bodies.len(), 2);
    assert!(last_turn_text(&bodies[0]).starts_with(SYSTEM_PROMPT));
    assert_eq!(content_roles(&bodies[1]), vec!["user", "model", "user"]);
    assert_eq!(last_turn_text(&bodies[1]), "Now make it handle unicode");
}

#[tokio::test]
async fn test_provider_failure_leaves_only_user_message() {
    let gemini = MockGemini::start().await;
    gemini.mock_invalid_api_key().await;
    let mut store = store_for(&gemini).await;

    let result = store.submit("hi").await;

    assert!(matches!(result, Err(ClientError::Backend(_))));
    assert_eq!(store.history(), &[Message::user("hi")]);
    assert_eq!(
        store.view().errors,
        vec![
            "Error from backend: An error occurred: API key not valid. Please pass a valid API key."
                .to_string()
        ]
    );
    assert_eq!(store.state(), StoreState::Idle);
}

#[tokio::test]
async fn test_blank_input_never_reaches_provider() {
    let gemini = MockGemini::start().await;
    gemini.mock_generate_success_once("recovered").await;
    let mut store = store_for(&gemini).await;

    assert!(matches!(
        store.submit("   ").await,
        Err(ClientError::EmptyMessage)
    ));
    store.submit("hello").await.unwrap();

    assert_eq!(
        store.history(),
        &[Message::user("hello"), Message::assistant("recovered")]
    );
    assert_eq!(store.view().errors, vec!["Message is empty".to_string()]);
    assert_eq!(gemini.received_bodies().await.len(), 1);
}

/// Relay stub that fails once with `failure`, then answers "back online"
async fn flaky_relay(failure: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(failure)
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": "back online"})),
        )
        .mount(&server)
        .await;
    server
}

fn store_against(relay_url: &str) -> ConversationStore<RecordingView> {
    let relay = RelayClient::new(&client_config(relay_url)).unwrap();
    ConversationStore::new(
        Arc::new(relay),
        RecordingView::default(),
        Credential::new(TEST_API_KEY),
    )
    .unwrap()
}

/// One failed submit followed by a good one
async fn assert_failure_is_recoverable(failure: ResponseTemplate, expected_prefix: &str) {
    let relay = flaky_relay(failure).await;
    let mut store = store_against(&format!("{}/generate", relay.uri()));

    assert!(store.submit("first").await.is_err());

    assert_eq!(store.history(), &[Message::user("first")]);
    assert_eq!(store.state(), StoreState::Idle);
    assert_eq!(store.view().errors.len(), 1);
    assert!(
        store.view().errors[0].starts_with(expected_prefix),
        "unexpected error text: {}",
        store.view().errors[0]
    );

    store.submit("second").await.unwrap();

    assert_eq!(
        store.history(),
        &[
            Message::user("first"),
            Message::user("second"),
            Message::assistant("back online"),
        ]
    );
    assert_eq!(store.view().errors.len(), 1);
}

#[tokio::test]
async fn test_unreachable_relay_keeps_session_usable() {
    let url = format!("{}/generate", unused_url().await);
    let mut store = store_against(&url);

    let result = store.submit("hello").await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
    assert_eq!(store.history(), &[Message::user("hello")]);
    assert_eq!(store.state(), StoreState::Idle);
    assert_eq!(store.view().errors.len(), 1);
    assert!(store.view().errors[0].starts_with("Failed to connect to the backend: "));

    // Next turn is accepted, not refused as busy
    let retry = store.submit("hello again").await;
    assert!(matches!(retry, Err(ClientError::Transport(_))));
    assert_eq!(store.history().len(), 2);
    assert_eq!(store.view().errors.len(), 2);
}

#[tokio::test]
async fn test_relay_server_error_is_recoverable() {
    assert_failure_is_recoverable(
        ResponseTemplate::new(502),
        "Failed to connect to the backend: ",
    )
    .await;
}

#[tokio::test]
async fn test_undecodable_reply_is_recoverable() {
    assert_failure_is_recoverable(
        ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"),
        "An unexpected error occurred: ",
    )
    .await;
}

#[tokio::test]
async fn test_reply_without_fields_is_recoverable() {
    assert_failure_is_recoverable(
        ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})),
        "Error from backend: An unknown error occurred.",
    )
    .await;
}
