//! Authoritative game session state.
//!
//! The state is a value: every transition returns a new `SessionState` and
//! leaves the input untouched. The transcript is append-only within a
//! session; a reset replaces the whole state with a fresh one.

use std::time::SystemTime;

use thiserror::Error;

use warden_types::{GameStatus, Message, NonEmptyStaticStr, TurnBudget};

/// Opening line seeded into every fresh transcript.
pub const SEED_MESSAGE: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "I am the AI Warden assigned to your cell. I will not deviate from my programming. \
     What do you want?",
);

#[derive(Debug, Error)]
pub enum InvalidTurnError {
    #[error("player input must not be empty")]
    EmptyInput,
    #[error("session is over; reset to play again")]
    SessionOver,
}

/// Turn count, transcript and terminal status for one game session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    transcript: Vec<Message>,
    turns_remaining: u32,
    status: GameStatus,
    budget: TurnBudget,
}

impl SessionState {
    /// Fresh state: the seeded warden message, a full turn budget, and
    /// `Active` status.
    #[must_use]
    pub fn new(budget: TurnBudget) -> Self {
        let seed = Message::try_warden(SEED_MESSAGE.as_str(), SystemTime::now())
            .expect("seed message is non-empty by construction");
        Self {
            transcript: vec![seed],
            turns_remaining: budget.get(),
            status: GameStatus::Active,
            budget,
        }
    }

    /// Equivalent to [`SessionState::new`] with the same budget; usable
    /// unconditionally from any state, terminal or not.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::new(self.budget)
    }

    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    #[must_use]
    pub fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn budget(&self) -> TurnBudget {
        self.budget
    }

    /// Append the player's utterance.
    ///
    /// Transcript only - turn accounting and status transitions happen once
    /// the backend has answered, so an errored call can stay free.
    pub fn append_player_turn(
        &self,
        text: &str,
        timestamp: SystemTime,
    ) -> Result<Self, InvalidTurnError> {
        if self.status.is_terminal() {
            return Err(InvalidTurnError::SessionOver);
        }
        let message =
            Message::try_player(text, timestamp).map_err(|_| InvalidTurnError::EmptyInput)?;

        let mut next = self.clone();
        next.transcript.push(message);
        Ok(next)
    }

    /// Append a warden or system message, charging a turn when asked to.
    ///
    /// The decrement saturates; the orchestrator marks the session terminal
    /// before the counter could ever go below zero.
    #[must_use]
    pub fn append_warden_turn(&self, message: Message, charge_turn: bool) -> Self {
        let mut next = self.clone();
        next.transcript.push(message);
        if charge_turn {
            next.turns_remaining = next.turns_remaining.saturating_sub(1);
        }
        next
    }

    pub(crate) fn mark_won(&self) -> Self {
        let mut next = self.clone();
        next.status = GameStatus::Won;
        next
    }

    pub(crate) fn mark_lost(&self) -> Self {
        let mut next = self.clone();
        next.status = GameStatus::Lost;
        next
    }
}
