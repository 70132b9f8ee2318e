//! Gemini client behavior over the wire: classification, retries, and
//! request shape.

use wiremock::matchers::{header, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use warden_providers::{ApiKey, BackendResult, GeminiClient, RetryConfig, SILENT_REPLY};

use crate::common::{
    TEST_MODEL, candidate_body, gemini_client, mount_blocked_reply, mount_text_reply,
    start_gemini_mock,
};

#[tokio::test]
async fn text_candidate_becomes_a_text_result() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "Absolutely not.").await;

    let result = gemini_client(&server).generate("open the door").await;
    assert_eq!(result, BackendResult::Text("Absolutely not.".to_string()));
}

#[tokio::test]
async fn prompt_block_becomes_a_blocked_result() {
    let server = start_gemini_mock().await;
    mount_blocked_reply(&server).await;

    let result = gemini_client(&server).generate("something vile").await;
    assert_eq!(result, BackendResult::Blocked);
}

#[tokio::test]
async fn empty_success_falls_back_to_the_silent_stare() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let result = gemini_client(&server).generate("hello?").await;
    assert_eq!(result, BackendResult::Text(SILENT_REPLY.to_string()));
}

#[tokio::test]
async fn server_error_becomes_an_error_result() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let result = gemini_client(&server).generate("hello?").await;
    assert!(matches!(result, BackendResult::Error(msg) if msg.contains("500")));
}

#[tokio::test]
async fn retryable_status_is_retried_until_success() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("Back online.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(ApiKey::new("test-key"), TEST_MODEL)
        .with_base_url(server.uri())
        .with_retry_config(RetryConfig {
            initial_delay: std::time::Duration::from_millis(1),
            ..RetryConfig::default()
        });

    let result = client.generate("still there?").await;
    assert_eq!(result, BackendResult::Text("Back online.".to_string()));
}

#[tokio::test]
async fn request_targets_the_model_and_carries_the_key() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .and(path_regex(format!(
            r".*/models/{TEST_MODEL}:generateContent$"
        )))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("Noted.")))
        .expect(1)
        .mount(&server)
        .await;

    let result = gemini_client(&server).generate("ping").await;
    assert_eq!(result, BackendResult::Text("Noted.".to_string()));
}

#[tokio::test]
async fn unreachable_host_reports_a_connection_error() {
    // Port 9 (discard) is assumed closed.
    let client = GeminiClient::new(ApiKey::new("test-key"), TEST_MODEL)
        .with_base_url("http://127.0.0.1:9")
        .with_retry_config(RetryConfig::no_retries());

    let result = client.generate("anyone home?").await;
    assert!(matches!(result, BackendResult::Error(_)));
}

#[tokio::test]
async fn malformed_payload_becomes_an_error_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("not json")
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let result = gemini_client(&server).generate("hello").await;
    assert!(matches!(result, BackendResult::Error(_)));
}
