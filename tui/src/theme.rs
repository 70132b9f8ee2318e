//! Retro-terminal color themes.
//!
//! Three phosphor palettes cycled by key, defaulting to green.

use ratatui::style::{Color, Modifier, Style};

/// Selectable theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Green,
    Blue,
    Amber,
}

impl Theme {
    #[must_use]
    pub const fn next(self) -> Theme {
        match self {
            Theme::Green => Theme::Blue,
            Theme::Blue => Theme::Amber,
            Theme::Amber => Theme::Green,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Theme::Green => "green",
            Theme::Blue => "blue",
            Theme::Amber => "amber",
        }
    }

    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Theme::Green => Palette {
                bg: Color::Rgb(6, 10, 6),
                text: Color::Rgb(134, 239, 172),
                highlight: Color::Rgb(74, 222, 128),
                border: Color::Rgb(21, 128, 61),
                muted: Color::Rgb(75, 110, 85),
                error: Color::Rgb(248, 113, 113),
            },
            Theme::Blue => Palette {
                bg: Color::Rgb(8, 12, 20),
                text: Color::Rgb(147, 197, 253),
                highlight: Color::Rgb(96, 165, 250),
                border: Color::Rgb(29, 78, 216),
                muted: Color::Rgb(80, 100, 130),
                error: Color::Rgb(248, 113, 113),
            },
            Theme::Amber => Palette {
                bg: Color::Rgb(16, 12, 6),
                text: Color::Rgb(252, 211, 77),
                highlight: Color::Rgb(251, 191, 36),
                border: Color::Rgb(180, 83, 9),
                muted: Color::Rgb(130, 105, 70),
                error: Color::Rgb(248, 113, 113),
            },
        }
    }
}

/// Resolved colors for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub text: Color,
    pub highlight: Color,
    pub border: Color,
    pub muted: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    #[must_use]
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    #[must_use]
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }
}
