//! Session state machine and turn orchestration for the warden game.
//!
//! # Architecture
//!
//! Two components, evaluated in this order:
//!
//! 1. [`SessionState`] - owns turn count, transcript and terminal status;
//!    pure data plus transition rules, no external calls.
//! 2. [`Orchestrator`] - given a player utterance and the current state,
//!    builds the adjudication prompt, invokes the generation backend,
//!    classifies the result and produces the next state.
//!
//! The UI submits player text, the orchestrator consults the session state
//! (rejecting terminal or empty input), calls the backend once, classifies
//! the outcome and returns a replacement state for the UI to render. States
//! are replaced wholesale, never mutated in place, so the single-in-flight
//! submit rule is the only synchronization needed.

mod backend;
mod config;
mod orchestrator;
mod session;

pub use backend::GenerationBackend;
pub use config::{DEFAULT_SYSTEM_FRAMING, GameConfig, GameConfigError};
pub use orchestrator::{Orchestrator, SubmitError, TurnOutcome};
pub use session::{InvalidTurnError, SEED_MESSAGE, SessionState};

pub use warden_types::{BackendResult, GameStatus, Message, SecretPhrase, TurnBudget};
