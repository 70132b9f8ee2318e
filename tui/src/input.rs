//! Key handling for the game screen.
//!
//! Keys map to [`Intent`]s; the caller owns what each intent does. The only
//! state held here is the draft line the player is typing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the player asked the application to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Send the drafted message as the next player turn.
    Submit(String),
    /// Start a fresh session.
    Reset,
    /// Show or hide the tips panel.
    ToggleTips,
    /// Advance to the next color theme.
    CycleTheme,
    /// Leave the game.
    Quit,
}

/// The line being composed, with a byte-offset cursor.
#[derive(Debug, Default, Clone)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Column of the cursor in characters, for terminal cursor placement.
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the draft, leaving it empty.
    #[must_use]
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }
}

/// Translate one key event into an [`Intent`], mutating the draft as needed.
///
/// Returns `None` for keys that only edit the draft (or do nothing). Key
/// releases are ignored so Windows terminals do not double-type.
///
/// While `input_locked` (a turn in flight, or the session over) Enter is a
/// no-op that leaves the draft intact, so text typed during the wait is not
/// lost. Control chords still work.
pub fn handle_key(key: KeyEvent, draft: &mut DraftInput, input_locked: bool) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            KeyCode::Char('r') => Some(Intent::Reset),
            KeyCode::Char('t') => Some(Intent::ToggleTips),
            KeyCode::Char('e') => Some(Intent::CycleTheme),
            KeyCode::Char('u') => {
                draft.clear();
                None
            }
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Intent::Quit),
        KeyCode::Enter => {
            if input_locked || draft.text().trim().is_empty() {
                return None;
            }
            Some(Intent::Submit(draft.take()))
        }
        KeyCode::Char(c) => {
            draft.insert(c);
            None
        }
        KeyCode::Backspace => {
            draft.backspace();
            None
        }
        KeyCode::Delete => {
            draft.delete();
            None
        }
        KeyCode::Left => {
            draft.move_left();
            None
        }
        KeyCode::Right => {
            draft.move_right();
            None
        }
        KeyCode::Home => {
            draft.move_home();
            None
        }
        KeyCode::End => {
            draft.move_end();
            None
        }
        _ => None,
    }
}
