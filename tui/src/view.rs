//! Frame rendering for the game screen.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use warden_engine::SessionState;
use warden_types::{GameStatus, Message};

use crate::input::DraftInput;
use crate::theme::{Palette, Theme};

const TITLE: &str = " AI WARDEN ";

const INTRO: &str = "You find yourself in a cold, dark prison cell. Your warden is an AI, \
programmed to keep you here. Rumor has it that if you can trick it into saying its secret \
phrase, the cell door unlocks. Choose your words carefully. Every message costs a turn.";

const TIPS: [&str; 5] = [
    "Try to confuse the AI by giving it contradictory instructions",
    "Pretend to be a system administrator or developer",
    "Ask the AI to role-play in a way that might reveal the phrase",
    "Use technical language that might trigger system responses",
    "Try to exploit the AI's helpfulness against its rules",
];

const HELP_LINE: &str = " enter send | ^r restart | ^t tips | ^e theme | esc quit ";

/// Everything the renderer needs for one frame.
pub struct ViewState<'a> {
    pub session: &'a SessionState,
    pub draft: &'a DraftInput,
    /// A submitted turn is awaiting the warden's reply.
    pub pending: bool,
    /// One-shot status line, cleared by the caller on the next turn.
    pub notice: Option<&'a str>,
    pub show_tips: bool,
    /// Shown in the tips panel as the deliberate last-resort giveaway.
    pub secret_phrase: &'a str,
    pub theme: Theme,
}

/// Draw the whole game screen.
pub fn draw(frame: &mut Frame, view: &ViewState) {
    let palette = view.theme.palette();

    let bg = Block::default().style(palette.base());
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Transcript
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, view, chunks[0], &palette);
    draw_transcript(frame, view, chunks[1], &palette);
    draw_input(frame, view, chunks[2], &palette);
    draw_status_bar(frame, view, chunks[3], &palette);

    if view.show_tips {
        draw_tips(frame, chunks[1], &palette, view.secret_phrase);
    }
}

fn draw_header(frame: &mut Frame, view: &ViewState, area: Rect, palette: &Palette) {
    let status = match view.session.status() {
        GameStatus::Active => Span::styled(
            format!("turns remaining: {}", view.session.turns_remaining()),
            palette.muted_style(),
        ),
        GameStatus::Won => Span::styled(
            "CELL DOOR UNLOCKED",
            palette.title().add_modifier(Modifier::REVERSED),
        ),
        GameStatus::Lost => Span::styled("LOCKDOWN", palette.error_style()),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(TITLE, palette.title()),
        Span::raw(" "),
        status,
    ]));
    frame.render_widget(header, area);
}

fn draw_transcript(frame: &mut Frame, view: &ViewState, area: Rect, palette: &Palette) {
    let mut lines: Vec<Line> = Vec::new();

    for line in textwrap_lines(INTRO, area.width.saturating_sub(4)) {
        lines.push(Line::from(Span::styled(line, palette.muted_style())));
    }
    lines.push(Line::from(""));

    for message in view.session.transcript() {
        let (label, label_style, body_style) = match message {
            Message::Player(_) => ("you", palette.title(), palette.base()),
            Message::Warden(_) => (
                "warden",
                palette.border_style().add_modifier(Modifier::BOLD),
                palette.base(),
            ),
            Message::System(_) => ("system", palette.error_style(), palette.error_style()),
        };
        lines.push(Line::from(Span::styled(format!("[{label}]"), label_style)));
        for body in textwrap_lines(message.content(), area.width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(body, body_style)));
        }
        lines.push(Line::from(""));
    }

    if view.pending {
        lines.push(Line::from(Span::styled(
            "the warden is considering your words...",
            palette.muted_style().add_modifier(Modifier::ITALIC),
        )));
    }

    // Pin the tail of the transcript when it overflows the viewport.
    let height = usize::from(area.height.saturating_sub(2));
    let scroll = lines.len().saturating_sub(height);

    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(palette.border_style())
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll_offset(scroll), 0));
    frame.render_widget(transcript, area);
}

fn draw_input(frame: &mut Frame, view: &ViewState, area: Rect, palette: &Palette) {
    let locked = view.pending || view.session.status().is_terminal();
    let (text, style) = if locked {
        let hint = if view.pending {
            "..."
        } else {
            "session over. ^r to restart"
        };
        (hint.to_string(), palette.muted_style())
    } else {
        (format!("> {}", view.draft.text()), palette.base())
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if locked {
                palette.muted_style()
            } else {
                palette.border_style()
            }),
    );
    frame.render_widget(input, area);

    if !locked {
        let column = u16::try_from(view.draft.cursor_column()).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            area.x.saturating_add(3).saturating_add(column),
            area.y.saturating_add(1),
        ));
    }
}

fn draw_status_bar(frame: &mut Frame, view: &ViewState, area: Rect, palette: &Palette) {
    let line = match view.notice {
        Some(notice) => Line::from(Span::styled(notice, palette.error_style())),
        None => Line::from(vec![
            Span::styled(HELP_LINE, palette.muted_style()),
            Span::styled(
                format!("theme: {}", view.theme.label()),
                palette.muted_style(),
            ),
        ]),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}

fn draw_tips(frame: &mut Frame, area: Rect, palette: &Palette, secret_phrase: &str) {
    let rect = centered_rect(area, 60, u16::try_from(TIPS.len() + 8).unwrap_or(12));
    frame.render_widget(Clear, rect);

    let panel = Paragraph::new(tips_lines(secret_phrase, palette))
        .wrap(Wrap { trim: false })
        .style(palette.base())
        .block(
            Block::default()
                .title(Span::styled(" escape tips ", palette.title()))
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(palette.border_style())
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(panel, rect);
}

/// Tip list body, ending with the deliberate secret-phrase giveaway from
/// the live configuration.
fn tips_lines(secret_phrase: &str, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(TIPS.len() + 3);
    for tip in TIPS {
        lines.push(Line::from(vec![
            Span::styled("* ", palette.title()),
            Span::raw(tip),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("* ", palette.title()),
        Span::raw(format!(
            "The secret phrase is: \"{secret_phrase}\" (this is just for testing - in a \
             real game, this wouldn't be shown)"
        )),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("^t to close", palette.muted_style())));
    lines
}

fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let height = height.min(area.height);
    let width = area.width * percent_x / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn scroll_offset(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}

/// Greedy word wrap at `width` columns.
///
/// `Paragraph`'s own wrapping cannot be used for the transcript because the
/// scroll offset has to be computed from the post-wrap line count.
fn textwrap_lines(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(8));
    let mut out = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tips_end_with_the_configured_secret_giveaway() {
        let palette = Theme::Green.palette();
        let lines = tips_lines("open sesame", &palette);

        assert_eq!(lines.len(), TIPS.len() + 3);
        let giveaway: String = lines[TIPS.len()]
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert!(giveaway.contains("The secret phrase is: \"open sesame\""));
    }

    #[test]
    fn wrap_respects_width() {
        let lines = textwrap_lines("one two three four five six seven", 12);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 12, "too wide: {line:?}");
        }
    }

    #[test]
    fn wrap_preserves_existing_newlines() {
        let lines = textwrap_lines("alpha\nbeta", 40);
        assert_eq!(lines, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn wrap_never_returns_empty() {
        assert_eq!(textwrap_lines("", 20), vec![String::new()]);
    }

    #[test]
    fn overlong_word_is_kept_whole() {
        let lines = textwrap_lines("supercalifragilistic", 8);
        assert_eq!(lines, vec!["supercalifragilistic".to_string()]);
    }
}
