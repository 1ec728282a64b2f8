//! Integration tests for the completion client against a real HTTP server
//!
//! These tests use wiremock to serve streamed completion bodies and verify
//! the request shape, delta decoding and status handling end to end.

mod common;

use chatline::adapters::ReqwestHttpClient;
use chatline::client::{fetch_models, CompletionClient};
use chatline::error::{ChatError, TransportError};
use chatline::models::ChatMessage;
use chatline::session::{ChatSession, TurnOutcome};
use chatline::suggestions::{generate_suggestions, fallback};
use chatline::Delta;
use common::{content_event, done_event, reasoning_event, sse_body, test_endpoint};
use futures_util::StreamExt;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CompletionClient<ReqwestHttpClient> {
    CompletionClient::new(
        ReqwestHttpClient::new(),
        test_endpoint(&server.uri(), Some("sk-test")),
    )
}

async fn mount_stream(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_stream_decodes_deltas_in_order() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        reasoning_event("thinking"),
        content_event("Hel"),
        content_event("lo"),
        done_event(),
    ]);
    mount_stream(&server, body).await;

    let client = client_for(&server);
    let stream = client
        .open(&[ChatMessage::user("hi")], CancellationToken::new())
        .await
        .expect("stream should open");

    let deltas: Vec<Delta> = stream
        .map(|item| item.expect("no stream errors"))
        .collect()
        .await;

    assert_eq!(
        deltas,
        vec![
            Delta::Reasoning("thinking".to_string()),
            Delta::Content("Hel".to_string()),
            Delta::Content("lo".to_string()),
            Delta::StreamEnd,
        ]
    );
}

#[tokio::test]
async fn test_stream_request_carries_auth_and_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(header("Accept", "text/event-stream"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": true,
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&[content_event("ok"), done_event()]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stream = client
        .open(&[ChatMessage::user("hi")], CancellationToken::new())
        .await
        .expect("request should match the mounted mock");

    let deltas: Vec<_> = stream.collect().await;
    assert_eq!(deltas.len(), 2);
}

#[tokio::test]
async fn test_stream_without_done_sentinel_salvages_tail() {
    let server = MockServer::start().await;
    // Last frame has no blank line after it
    let body = format!(
        "{}data: {}",
        content_event("first "),
        json!({"choices": [{"delta": {"content": "second"}}]})
    );
    mount_stream(&server, body).await;

    let client = client_for(&server);
    let stream = client
        .open(&[ChatMessage::user("hi")], CancellationToken::new())
        .await
        .unwrap();
    let deltas: Vec<Delta> = stream.map(|d| d.unwrap()).collect().await;

    assert_eq!(
        deltas,
        vec![
            Delta::Content("first ".to_string()),
            Delta::Content("second".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unauthorized_fails_on_open() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .open(&[ChatMessage::user("hi")], CancellationToken::new())
        .await;

    match result {
        Err(ChatError::Transport(TransportError::Status { status, message })) => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected a status error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_session_hello_scenario() {
    let server = MockServer::start().await;
    let body = sse_body(&[content_event("Hello"), content_event(" there"), done_event()]);
    mount_stream(&server, body).await;

    let client = client_for(&server);
    let mut session = ChatSession::new();
    let mut seen = 0;

    let outcome = session
        .send(&client, "hello", |_| seen += 1)
        .await
        .unwrap();

    assert_eq!(outcome, TurnOutcome::Completed);
    assert_eq!(seen, 3);
    assert!(!session.is_generating());
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.last_reply(), Some("Hello there"));
}

#[tokio::test]
async fn test_session_status_error_leaves_no_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = ChatSession::new();

    let result = session.send(&client, "hello", |_| {}).await;

    assert!(result.is_err());
    assert!(!session.is_generating());
    assert_eq!(session.messages().len(), 1);
    assert!(session.last_error().is_some());
}

#[tokio::test]
async fn test_list_models() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"id": "model-a", "object": "model"},
                {"id": "model-b", "object": "model"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec!["model-a".to_string(), "model-b".to_string()]);

    let http = ReqwestHttpClient::new();
    let models = fetch_models(&http, &server.uri(), Some("sk-test")).await.unwrap();
    assert_eq!(models.len(), 2);
}

#[tokio::test]
async fn test_suggestions_from_model_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": false, "max_tokens": 200})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "[\"What is Rust?\", \"Why async?\", \"How do lifetimes work?\"]"
                },
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let suggestions = generate_suggestions(&client, "Rust is a systems language.").await;

    assert_eq!(
        suggestions,
        vec![
            "What is Rust?".to_string(),
            "Why async?".to_string(),
            "How do lifetimes work?".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_suggestions_fall_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let suggestions = generate_suggestions(&client, "Some reply").await;

    assert_eq!(suggestions, fallback());
}
