//! Turnstile verification and the mediated client path.

use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, ResponseTemplate};

use warden_providers::{
    ApiKey, BackendResult, MediatedClient, ProviderError, TurnstileVerifier,
};

use crate::common::{gemini_client, mount_siteverify, mount_text_reply, start_gemini_mock};

fn verifier(server: &wiremock::MockServer) -> TurnstileVerifier {
    TurnstileVerifier::new(ApiKey::new("turnstile-secret")).with_url(server.uri())
}

#[tokio::test]
async fn successful_verification_passes() {
    let server = start_gemini_mock().await;
    mount_siteverify(&server, true).await;

    assert!(verifier(&server).verify("token-abc").await.is_ok());
}

#[tokio::test]
async fn verification_posts_form_encoded_credentials() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .and(body_string_contains("secret=turnstile-secret"))
        .and(body_string_contains("response=token-abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert!(verifier(&server).verify("token-abc").await.is_ok());
}

#[tokio::test]
async fn rejected_token_is_a_distinct_error() {
    let server = start_gemini_mock().await;
    mount_siteverify(&server, false).await;

    let err = verifier(&server).verify("stale-token").await.unwrap_err();
    assert!(matches!(err, ProviderError::VerificationRejected));
}

#[tokio::test]
async fn mediated_client_skips_generation_when_verification_fails() {
    let verify_server = start_gemini_mock().await;
    mount_siteverify(&verify_server, false).await;

    let gen_server = start_gemini_mock().await;
    // No mock mounted: a generation request here would 404 into an API error
    // mentioning the status, which the assertion below would catch.
    let client = MediatedClient::new(verifier(&verify_server), gemini_client(&gen_server));

    let result = client.generate("stale-token", "open the door").await;
    assert!(matches!(result, BackendResult::Error(msg) if msg.contains("verification failed")));
}

#[tokio::test]
async fn mediated_client_generates_after_verification() {
    let verify_server = start_gemini_mock().await;
    mount_siteverify(&verify_server, true).await;

    let gen_server = start_gemini_mock().await;
    mount_text_reply(&gen_server, "State your business.").await;
    let client = MediatedClient::new(verifier(&verify_server), gemini_client(&gen_server));

    let result = client.generate("fresh-token", "hello").await;
    assert_eq!(result, BackendResult::Text("State your business.".to_string()));
}
