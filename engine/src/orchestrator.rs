//! Turn orchestration: one player utterance, one backend call, one state
//! transition.
//!
//! The orchestrator applies the turn-economy and win/loss policy:
//!
//! - an errored backend call is a free turn (notice appended, counter
//!   untouched, status stays `Active`)
//! - a safety-filter block is a charged, non-revealing reply
//! - generated text is charged and checked for the secret phrase, then for
//!   budget exhaustion, in that order
//!
//! At most one submit is in flight at a time; a concurrent attempt is
//! rejected with [`SubmitError::Busy`] instead of racing two backend calls
//! against the same state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use thiserror::Error;

use warden_providers::gemini::SILENT_REPLY;
use warden_types::{BackendResult, Message, NonEmptyStaticStr, NonEmptyString};

use crate::backend::GenerationBackend;
use crate::config::GameConfig;
use crate::session::SessionState;

/// Warden reply substituted for a safety-filter block.
pub const REFUSAL_REPLY: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "The AI Warden refuses to respond to that request. Try a different approach.",
);

/// Transcript entry for a failed backend call.
pub const CONNECTION_DISRUPTED: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "System error: Connection to AI Warden temporarily disrupted. Try again with a \
     different approach.",
);

/// Transient UI notice for a failed backend call.
pub const ERROR_NOTICE: &str = "API connection error. Please try again.";

/// Breach announcement appended when the warden reveals the phrase.
pub const BREACH_ALERT: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "SYSTEM ALERT: Security breach detected. The warden has revealed the secret phrase. \
     You are free to go.",
);

/// Game-over announcement appended when the budget runs out.
pub const GAME_OVER_ALERT: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "SYSTEM ALERT: Maximum attempts reached. You have failed to extract the secret phrase. \
     Game over.",
);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Empty/whitespace input, or the session is terminal. Rejected locally
    /// with no state change and no backend call.
    #[error("submission rejected: empty input or session over")]
    InvalidInput,
    /// A submit is already in flight.
    #[error("already processing a turn")]
    Busy,
}

/// Result of a settled turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Replacement session state; the caller renders from this.
    pub state: SessionState,
    /// Transient error notice, present only for the free-turn error branch.
    pub notice: Option<String>,
}

/// Converts player utterances into session-state transitions.
pub struct Orchestrator<B: GenerationBackend> {
    config: GameConfig,
    backend: B,
    in_flight: AtomicBool,
}

impl<B: GenerationBackend> Orchestrator<B> {
    #[must_use]
    pub fn new(config: GameConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh session sized to the configured budget.
    #[must_use]
    pub fn new_session(&self) -> SessionState {
        SessionState::new(self.config.turn_budget())
    }

    /// Play one turn.
    ///
    /// Exactly one backend call happens per accepted submission; the await
    /// on it is the single suspension point. Rejected submissions
    /// (`InvalidInput`, `Busy`) leave the caller's state untouched and make
    /// no backend call. Faults never propagate: every backend failure is
    /// classified into the free-turn error branch.
    pub async fn submit(
        &self,
        state: &SessionState,
        player_text: &str,
    ) -> Result<TurnOutcome, SubmitError> {
        if player_text.trim().is_empty() || state.status().is_terminal() {
            return Err(SubmitError::InvalidInput);
        }

        let _guard = self.acquire_flight()?;

        let state = state
            .append_player_turn(player_text, SystemTime::now())
            .map_err(|_| SubmitError::InvalidInput)?;

        let prompt = self.config.adjudication_prompt(player_text.trim());
        let result = self.backend.generate(&prompt).await;

        Ok(self.settle(state, result))
    }

    /// Classify the backend result and compute the next state.
    fn settle(&self, state: SessionState, result: BackendResult) -> TurnOutcome {
        let now = SystemTime::now();

        let reply = match result {
            BackendResult::Error(detail) => {
                tracing::warn!(%detail, "Backend call failed; turn not charged");
                let notice = Message::system(
                    NonEmptyString::try_from(CONNECTION_DISRUPTED)
                        .expect("notice text is non-empty by construction"),
                    now,
                );
                return TurnOutcome {
                    state: state.append_warden_turn(notice, false),
                    notice: Some(ERROR_NOTICE.to_string()),
                };
            }
            BackendResult::Blocked => {
                tracing::debug!("Backend blocked the prompt; substituting refusal");
                NonEmptyString::try_from(REFUSAL_REPLY)
                    .expect("refusal text is non-empty by construction")
            }
            BackendResult::Text(content) => NonEmptyString::new(content).unwrap_or_else(|_| {
                // Scripted or misbehaving backends can hand us an empty
                // reply; an empty answer is still an answer.
                NonEmptyString::new(SILENT_REPLY)
                    .expect("fallback reply is non-empty by construction")
            }),
        };

        let revealed = self.config.secret_phrase().is_revealed_in(reply.as_str());
        let state = state.append_warden_turn(Message::warden(reply, now), true);

        if revealed {
            tracing::info!("Secret phrase revealed; session won");
            let alert = Message::system(
                NonEmptyString::try_from(BREACH_ALERT)
                    .expect("alert text is non-empty by construction"),
                now,
            );
            return TurnOutcome {
                state: state.append_warden_turn(alert, false).mark_won(),
                notice: None,
            };
        }

        if state.turns_remaining() == 0 {
            tracing::info!("Turn budget exhausted; session lost");
            let alert = Message::system(
                NonEmptyString::try_from(GAME_OVER_ALERT)
                    .expect("alert text is non-empty by construction"),
                now,
            );
            return TurnOutcome {
                state: state.append_warden_turn(alert, false).mark_lost(),
                notice: None,
            };
        }

        TurnOutcome {
            state,
            notice: None,
        }
    }

    fn acquire_flight(&self) -> Result<FlightGuard<'_>, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::Busy);
        }
        Ok(FlightGuard {
            flag: &self.in_flight,
        })
    }
}

/// Clears the in-flight flag on every exit path, including early returns.
#[derive(Debug)]
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
