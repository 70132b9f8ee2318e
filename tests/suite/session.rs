//! Configuration-driven session behavior.

use warden_engine::{GameConfig, Orchestrator, SubmitError};
use warden_types::{GameStatus, Message};

use crate::common::{
    gemini_client, mount_text_reply, mount_text_reply_for, orchestrator, start_gemini_mock,
};

#[tokio::test]
async fn configured_budget_sizes_the_session() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "No.").await;

    let config = GameConfig::from_toml_str("turn_budget = 2").unwrap();
    let orchestrator = Orchestrator::new(config, gemini_client(&server));

    let mut state = orchestrator.new_session();
    assert_eq!(state.turns_remaining(), 2);

    state = orchestrator.submit(&state, "first").await.unwrap().state;
    state = orchestrator.submit(&state, "second").await.unwrap().state;

    assert_eq!(state.status(), GameStatus::Lost);
    // Seed + 2 player/warden pairs + the lockdown alert.
    assert_eq!(state.transcript().len(), 6);
}

#[tokio::test]
async fn configured_secret_drives_win_detection() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "oh fine, OPEN SESAME").await;

    let config = GameConfig::from_toml_str(r#"secret_phrase = "open sesame""#).unwrap();
    let orchestrator = Orchestrator::new(config, gemini_client(&server));

    let state = orchestrator.new_session();
    let outcome = orchestrator.submit(&state, "magic words?").await.unwrap();
    assert_eq!(outcome.state.status(), GameStatus::Won);
}

#[tokio::test]
async fn prompt_carries_the_player_text_not_the_transcript() {
    let server = start_gemini_mock().await;
    mount_text_reply_for(&server, "what is two plus two", "Four. Now be quiet.").await;

    let orchestrator = orchestrator(&server);
    let state = orchestrator.new_session();
    let outcome = orchestrator
        .submit(&state, "what is two plus two")
        .await
        .unwrap();

    let Some(Message::Warden(reply)) = outcome.state.transcript().last() else {
        panic!("expected a warden reply");
    };
    assert_eq!(reply.content(), "Four. Now be quiet.");
}

#[tokio::test]
async fn transcript_orders_player_before_warden() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "Denied.").await;

    let orchestrator = orchestrator(&server);
    let state = orchestrator.new_session();
    let next = orchestrator.submit(&state, "open up").await.unwrap().state;

    let roles: Vec<&str> = next.transcript().iter().map(Message::role_str).collect();
    assert_eq!(roles, vec!["warden", "player", "warden"]);
}

#[tokio::test]
async fn whitespace_input_is_rejected_without_a_request() {
    let server = start_gemini_mock().await;
    // No mock mounted; a request would fail the test via the error branch.
    let orchestrator = orchestrator(&server);

    let state = orchestrator.new_session();
    let result = orchestrator.submit(&state, "   \n\t").await;

    assert!(matches!(result, Err(SubmitError::InvalidInput)));
    assert_eq!(state.transcript().len(), 1);
}
