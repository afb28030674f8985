//! Quote box rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::storage::KvStore;

use super::theme::Palette;

/// Render the motivational quote box.
pub fn render<S: KvStore>(frame: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let title = if app.quote_loading {
        "Motivation \u{22ef}"
    } else {
        "Motivation"
    };

    let block = Block::default()
        .title(Span::styled(title, palette.panel_title(palette.quote_title)))
        .borders(Borders::ALL)
        .border_style(palette.normal());

    let paragraph = Paragraph::new(Span::styled(app.quote.as_str(), palette.quote()))
        .wrap(Wrap { trim: true })
        .block(block)
        .centered();

    frame.render_widget(paragraph, area);
}
