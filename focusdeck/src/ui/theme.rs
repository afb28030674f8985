//! Theme and styling for the TUI.
//!
//! Two palettes (dark, light) selected by the persisted
//! [`ThemeKind`](crate::app::ThemeKind); every render function takes the
//! active palette rather than reaching for global constants.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ThemeKind;

/// Resolved color palette for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Primary foreground color.
    pub fg: Color,
    /// Secondary foreground color (dimmed text).
    pub fg_dim: Color,
    /// Background color.
    pub bg: Color,
    /// Highlight color for focused elements.
    pub highlight: Color,
    /// Success/running indicator color.
    pub success: Color,
    /// Warning/paused indicator color.
    pub warning: Color,
    /// Error indicator color.
    pub error: Color,
    /// Panel title color for the quote box.
    pub quote_title: Color,
    /// Panel title color for the timer panel.
    pub timer_title: Color,
    /// Panel title color for the tasks panel.
    pub tasks_title: Color,
    /// Status bar background.
    pub status_bg: Color,
}

/// Dark palette (default).
const DARK: Palette = Palette {
    fg: Color::White,
    fg_dim: Color::Gray,
    bg: Color::Black,
    highlight: Color::Cyan,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    quote_title: Color::Magenta,
    timer_title: Color::Cyan,
    tasks_title: Color::Green,
    status_bg: Color::Rgb(30, 30, 50),
};

/// Light palette.
const LIGHT: Palette = Palette {
    fg: Color::Black,
    fg_dim: Color::DarkGray,
    bg: Color::White,
    highlight: Color::Blue,
    success: Color::Rgb(0, 128, 0),
    warning: Color::Rgb(180, 120, 0),
    error: Color::Rgb(180, 0, 0),
    quote_title: Color::Rgb(140, 0, 140),
    timer_title: Color::Blue,
    tasks_title: Color::Rgb(0, 128, 0),
    status_bg: Color::Rgb(220, 220, 235),
};

impl Palette {
    /// The palette for a theme selection.
    #[must_use]
    pub const fn of(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => DARK,
            ThemeKind::Light => LIGHT,
        }
    }

    /// Normal text style.
    #[must_use]
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Dimmed text style (metadata, completed tasks).
    #[must_use]
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Bold text style.
    #[must_use]
    pub fn bold(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    /// Highlighted style (focused panel borders).
    #[must_use]
    pub fn highlighted(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected item style (in lists).
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for panel titles with a given color (bold).
    #[must_use]
    pub fn panel_title(&self, color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Style for the quote text (italic).
    #[must_use]
    pub fn quote(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::ITALIC)
    }

    /// Style for the status bar.
    #[must_use]
    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.fg).bg(self.status_bg)
    }

    /// Border style for a panel, highlighted when focused.
    #[must_use]
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.highlighted()
        } else {
            self.normal()
        }
    }
}
