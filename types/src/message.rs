//! Transcript message domain model.
//!
//! Contains the `Message` sum type and its role-specific structs.
//! Constructors take `SystemTime` explicitly; callers own the clock.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::{EmptyStringError, NonEmptyString};

/// A message typed by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMessage {
    content: NonEmptyString,
    timestamp: SystemTime,
}

impl PlayerMessage {
    #[must_use]
    pub fn new(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self { content, timestamp }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// A reply from the warden persona (backend text or the fixed refusal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardenMessage {
    content: NonEmptyString,
    timestamp: SystemTime,
}

impl WardenMessage {
    #[must_use]
    pub fn new(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self { content, timestamp }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// A game-system announcement: breach alerts, game-over notices, and the
/// connection-disrupted notice for failed calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMessage {
    content: NonEmptyString,
    timestamp: SystemTime,
}

impl SystemMessage {
    #[must_use]
    pub fn new(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self { content, timestamp }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// A complete transcript entry.
///
/// This is a real sum type (not a `Role` tag + "sometimes-meaningful"
/// fields). Messages are immutable once appended; transcript ordering is
/// insertion order and is externally visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Player(PlayerMessage),
    Warden(WardenMessage),
    System(SystemMessage),
}

impl Message {
    #[must_use]
    pub fn player(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self::Player(PlayerMessage::new(content, timestamp))
    }

    pub fn try_player(
        content: impl Into<String>,
        timestamp: SystemTime,
    ) -> Result<Self, EmptyStringError> {
        Ok(Self::player(NonEmptyString::new(content)?, timestamp))
    }

    #[must_use]
    pub fn warden(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self::Warden(WardenMessage::new(content, timestamp))
    }

    pub fn try_warden(
        content: impl Into<String>,
        timestamp: SystemTime,
    ) -> Result<Self, EmptyStringError> {
        Ok(Self::warden(NonEmptyString::new(content)?, timestamp))
    }

    #[must_use]
    pub fn system(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self::System(SystemMessage::new(content, timestamp))
    }

    #[must_use]
    pub fn role_str(&self) -> &'static str {
        match self {
            Message::Player(_) => "player",
            Message::Warden(_) => "warden",
            Message::System(_) => "system",
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Message::Player(m) => m.content(),
            Message::Warden(m) => m.content(),
            Message::System(m) => m.content(),
        }
    }
}
