//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, PanelFocus};
use crate::storage::KvStore;

use super::theme::Palette;

/// Render the one-line status bar: transient message or key hints.
pub fn render<S: KvStore>(frame: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let text = app.status_message.clone().unwrap_or_else(|| hints(app.focus));
    let line = Line::from(Span::styled(format!(" {text}"), palette.status_bar()));
    frame.render_widget(Paragraph::new(line).style(palette.status_bar()), area);
}

/// Context-sensitive key hints per focused panel.
fn hints(focus: PanelFocus) -> String {
    match focus {
        PanelFocus::Input => "enter add task | tab switch panel | esc quit".to_string(),
        PanelFocus::Tasks => {
            "j/k move | J/K reorder | s select | c complete | d delete | e export | g quote | t theme"
                .to_string()
        }
        PanelFocus::Timer => "space start/pause | r reset | +/- minutes | enter set".to_string(),
    }
}
