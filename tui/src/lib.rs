//! Terminal view layer for the warden game.
//!
//! Pure presentation: this crate consumes a [`warden_engine::SessionState`]
//! and emits [`Intent`]s; it holds no game logic of its own. The engine
//! decides what a turn means; this crate decides what it looks like.

mod input;
mod theme;
mod view;

pub use input::{DraftInput, Intent, handle_key};
pub use theme::{Palette, Theme};
pub use view::{ViewState, draw};
