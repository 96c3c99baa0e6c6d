//! Shared helpers for backend integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Chat completion body with one choice per content, indexes in the given order
pub fn chat_response(choices: &[(u32, &str)]) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": choices.iter().map(|(index, content)| json!({
            "index": index,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop",
        })).collect::<Vec<_>>(),
    })
}

/// Text completion body with one choice per text, indexes in the given order
pub fn completion_response(choices: &[(u32, &str)]) -> Value {
    json!({
        "id": "cmpl-test",
        "object": "text_completion",
        "choices": choices.iter().map(|(index, text)| json!({
            "index": index,
            "text": text,
            "finish_reason": "stop",
        })).collect::<Vec<_>>(),
    })
}

/// Server answering POST `route` with `body`
pub async fn json_server(route: &str, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Server answering POST `route` with an error status
pub async fn error_server(route: &str, status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

/// JSON bodies of every request the server received
pub async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.body_json::<Value>().expect("request body should be JSON"))
        .collect()
}
