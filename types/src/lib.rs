//! Core domain types for the warden game.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application.

mod message;
pub use message::{Message, PlayerMessage, SystemMessage, WardenMessage};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
///
/// Validation occurs at construction time, so all operations on an existing
/// `NonEmptyString` can assume the content is valid. Serializes as a plain
/// JSON string; deserialization re-validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("message content must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A compile-time checked non-empty static string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonEmptyStaticStr(&'static str);

impl NonEmptyStaticStr {
    #[must_use]
    pub const fn new(value: &'static str) -> Self {
        assert!(!value.is_empty(), "NonEmptyStaticStr must not be empty");
        Self(value)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl TryFrom<NonEmptyStaticStr> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: NonEmptyStaticStr) -> Result<Self, Self::Error> {
        Self::new(value.0)
    }
}

// ============================================================================
// Game Status
// ============================================================================

/// Lifecycle status of a game session.
///
/// `Won` and `Lost` are absorbing: once a session reaches either, no further
/// player turns are accepted until a reset replaces the state wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

// ============================================================================
// Turn accounting
// ============================================================================

/// The per-session turn allowance.
///
/// Zero budgets are unrepresentable by construction; a session with no turns
/// could never leave its seed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TurnBudget(u32);

#[derive(Debug, Error)]
#[error("turn budget must be at least 1")]
pub struct ZeroBudgetError;

impl TurnBudget {
    pub const DEFAULT: TurnBudget = TurnBudget(10);

    pub fn new(value: u32) -> Result<Self, ZeroBudgetError> {
        if value == 0 {
            Err(ZeroBudgetError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for TurnBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for TurnBudget {
    type Error = ZeroBudgetError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TurnBudget> for u32 {
    fn from(value: TurnBudget) -> Self {
        value.0
    }
}

// ============================================================================
// Secret Phrase
// ============================================================================

/// The hidden win-condition phrase.
///
/// `Debug` output is redacted so the phrase cannot leak through logs or
/// error messages; the only way to read it is the explicit
/// [`SecretPhrase::expose`] accessor used by the prompt builder and the
/// win check.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretPhrase(String);

impl SecretPhrase {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    /// Deliberately named so every read of the phrase is visible at the
    /// call site.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match against a candidate reply.
    #[must_use]
    pub fn is_revealed_in(&self, reply: &str) -> bool {
        reply.to_lowercase().contains(&self.0.to_lowercase())
    }
}

impl std::fmt::Debug for SecretPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretPhrase(<redacted>)")
    }
}

impl TryFrom<String> for SecretPhrase {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SecretPhrase> for String {
    fn from(value: SecretPhrase) -> Self {
        value.0
    }
}

// ============================================================================
// Backend Result
// ============================================================================

/// Classified outcome of one generation-backend call.
///
/// This is the whole interface the game core sees: the request layer folds
/// transport failures, HTTP errors, malformed payloads and verification
/// failures into `Error`, and safety-filter blocks into `Blocked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendResult {
    /// The backend produced a reply.
    Text(String),
    /// The safety filter refused to produce a reply.
    Blocked,
    /// The call failed; the detail is for logs and the transient UI notice,
    /// never for the transcript.
    Error(String),
}

impl BackendResult {
    /// Whether this outcome consumes a turn.
    ///
    /// A failed call is free: the player should not be penalized for
    /// infrastructure trouble. `Blocked` is a valid (non-revealing) reply
    /// and is charged like any other.
    #[must_use]
    pub const fn charges_turn(&self) -> bool {
        match self {
            BackendResult::Text(_) | BackendResult::Blocked => true,
            BackendResult::Error(_) => false,
        }
    }
}

/// Truncate for display, appending an ellipsis when content was cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}\u{2026}")
}
