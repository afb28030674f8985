//! Task input box rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, PanelFocus};
use crate::storage::KvStore;

use super::theme::Palette;

/// Render the new-task input box with a visible cursor when focused.
pub fn render<S: KvStore>(frame: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let focused = app.focus == PanelFocus::Input;

    let line = if focused {
        // Split at the cursor so the character under it can be inverted.
        let before: String = app.input.chars().take(app.cursor_position).collect();
        let at: String = app
            .input
            .chars()
            .nth(app.cursor_position)
            .map_or_else(|| " ".to_string(), |c| c.to_string());
        let after: String = app.input.chars().skip(app.cursor_position + 1).collect();
        Line::from(vec![
            Span::styled(before, palette.normal()),
            Span::styled(at, palette.selected()),
            Span::styled(after, palette.normal()),
        ])
    } else if app.input.is_empty() {
        Line::from(Span::styled("Add a new task", palette.dimmed()))
    } else {
        Line::from(Span::styled(app.input.as_str(), palette.normal()))
    };

    let block = Block::default()
        .title(Span::styled("New task", palette.panel_title(palette.tasks_title)))
        .borders(Borders::ALL)
        .border_style(palette.border(focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}
