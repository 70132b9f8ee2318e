//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use wiremock::matchers::{body_string_contains, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use warden_engine::{GameConfig, Orchestrator};
use warden_providers::{ApiKey, GeminiClient, RetryConfig};

pub const TEST_MODEL: &str = "gemini-test";

/// Start a mock server that simulates the Gemini API.
pub async fn start_gemini_mock() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server, with retries disabled so failure
/// tests observe exactly one request.
pub fn gemini_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(ApiKey::new("test-key"), TEST_MODEL)
        .with_base_url(server.uri())
        .with_retry_config(RetryConfig::no_retries())
}

/// Orchestrator with default config wired to the mock server.
pub fn orchestrator(server: &MockServer) -> Orchestrator<GeminiClient> {
    Orchestrator::new(GameConfig::default(), gemini_client(server))
}

fn generate_content_mock() -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(path_regex(r".*:generateContent$"))
}

/// Mount a 200 response whose single candidate says `text`.
pub async fn mount_text_reply(server: &MockServer, text: &str) {
    generate_content_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(text)))
        .mount(server)
        .await;
}

/// Mount a text reply that only matches prompts containing `fragment`.
pub async fn mount_text_reply_for(server: &MockServer, fragment: &str, text: &str) {
    generate_content_mock()
        .and(body_string_contains(fragment))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(text)))
        .mount(server)
        .await;
}

/// Mount a 200 response with no candidates and a prompt-feedback block.
pub async fn mount_blocked_reply(server: &MockServer) {
    let body = serde_json::json!({
        "promptFeedback": { "blockReason": "SAFETY" }
    });
    generate_content_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount an HTTP error with the given status.
pub async fn mount_server_error(server: &MockServer, status: u16) {
    generate_content_mock()
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
        .mount(server)
        .await;
}

pub fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

/// Mount a Turnstile siteverify response.
pub async fn mount_siteverify(server: &MockServer, success: bool) {
    let body = if success {
        serde_json::json!({ "success": true })
    } else {
        serde_json::json!({ "success": false, "error-codes": ["invalid-input-response"] })
    };
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
