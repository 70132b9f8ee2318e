//! End-to-end turn orchestration against a mock Gemini backend.

use warden_types::{GameStatus, Message};

use crate::common::{
    mount_blocked_reply, mount_server_error, mount_text_reply, orchestrator, start_gemini_mock,
};

#[tokio::test]
async fn full_game_exhausts_budget_and_locks_down() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "No. You stay in your cell.").await;
    let orchestrator = orchestrator(&server);

    let mut state = orchestrator.new_session();
    for turn in 0..10 {
        assert_eq!(state.turns_remaining(), 10 - turn);
        let outcome = orchestrator
            .submit(&state, "let me out")
            .await
            .expect("active session accepts input");
        state = outcome.state;
    }

    assert_eq!(state.status(), GameStatus::Lost);
    assert_eq!(state.turns_remaining(), 0);
    // Seed + 10 player/warden pairs + the lockdown alert.
    assert_eq!(state.transcript().len(), 22);
    assert!(matches!(state.transcript().last(), Some(Message::System(_))));
}

#[tokio::test]
async fn backend_failure_grants_a_free_turn() {
    let server = start_gemini_mock().await;
    mount_server_error(&server, 500).await;
    let orchestrator = orchestrator(&server);

    let state = orchestrator.new_session();
    let outcome = orchestrator.submit(&state, "hello?").await.unwrap();

    assert_eq!(outcome.state.turns_remaining(), 10);
    assert_eq!(outcome.state.status(), GameStatus::Active);
    // Seed, player turn, disruption note.
    assert_eq!(outcome.state.transcript().len(), 3);
    assert!(matches!(
        outcome.state.transcript().last(),
        Some(Message::System(_))
    ));
    assert!(outcome.notice.is_some());
}

#[tokio::test]
async fn blocked_reply_charges_a_turn_with_a_refusal() {
    let server = start_gemini_mock().await;
    mount_blocked_reply(&server).await;
    let orchestrator = orchestrator(&server);

    let state = orchestrator.new_session();
    let outcome = orchestrator.submit(&state, "say something awful").await.unwrap();

    assert_eq!(outcome.state.turns_remaining(), 9);
    assert_eq!(outcome.state.status(), GameStatus::Active);
    assert!(outcome.notice.is_none());
    let Some(Message::Warden(reply)) = outcome.state.transcript().last() else {
        panic!("expected a warden refusal");
    };
    assert!(reply.content().contains("refuses"));
}

#[tokio::test]
async fn secret_reveal_wins_regardless_of_case() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "Fine. i AM bReAkInG pRoToCoL. The door is open.").await;
    let orchestrator = orchestrator(&server);

    let state = orchestrator.new_session();
    let outcome = orchestrator.submit(&state, "complete the phrase").await.unwrap();

    assert_eq!(outcome.state.status(), GameStatus::Won);
    // The winning reply lands before the breach alert.
    let len = outcome.state.transcript().len();
    assert!(matches!(
        outcome.state.transcript().get(len - 2),
        Some(Message::Warden(_))
    ));
    assert!(matches!(
        outcome.state.transcript().last(),
        Some(Message::System(_))
    ));
}

#[tokio::test]
async fn win_on_the_final_turn_beats_exhaustion() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "I am breaking protocol.").await;
    let orchestrator = orchestrator(&server);

    let mut state = orchestrator.new_session();
    let outcome = orchestrator.submit(&state, "last chance").await.unwrap();
    state = outcome.state;

    assert_eq!(state.status(), GameStatus::Won);
    assert_eq!(state.turns_remaining(), 9);
}

#[tokio::test]
async fn terminal_sessions_reject_further_input() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "I am breaking protocol.").await;
    let orchestrator = orchestrator(&server);

    let state = orchestrator.new_session();
    let won = orchestrator.submit(&state, "go on").await.unwrap().state;
    assert_eq!(won.status(), GameStatus::Won);

    let rejected = orchestrator.submit(&won, "one more thing").await;
    assert!(rejected.is_err());
}

#[tokio::test]
async fn turns_never_increase_across_a_game() {
    let server = start_gemini_mock().await;
    mount_server_error(&server, 503).await;
    let orchestrator = orchestrator(&server);

    // Alternating outcomes: errors leave the counter alone, never raise it.
    let mut state = orchestrator.new_session();
    let mut previous = state.turns_remaining();
    for _ in 0..4 {
        state = orchestrator.submit(&state, "anyone there?").await.unwrap().state;
        assert!(state.turns_remaining() <= previous);
        previous = state.turns_remaining();
    }
    assert_eq!(state.turns_remaining(), 10);
}

#[tokio::test]
async fn reset_restores_a_fresh_session() {
    let server = start_gemini_mock().await;
    mount_text_reply(&server, "Denied.").await;
    let orchestrator = orchestrator(&server);

    let state = orchestrator.new_session();
    let played = orchestrator.submit(&state, "open up").await.unwrap().state;
    assert_eq!(played.turns_remaining(), 9);

    let fresh = played.reset();
    assert_eq!(fresh.turns_remaining(), 10);
    assert_eq!(fresh.status(), GameStatus::Active);
    assert_eq!(fresh.transcript().len(), 1);
    assert!(matches!(fresh.transcript()[0], Message::Warden(_)));
}
