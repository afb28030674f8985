//! Timer panel rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, PanelFocus};
use crate::storage::KvStore;
use crate::timer::TimerPhase;

use super::theme::Palette;

/// Formats a second count as `MM:SS`.
#[must_use]
pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render the timer panel: remaining time, phase, session task, and the
/// staged duration.
pub fn render<S: KvStore>(frame: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let focused = app.focus == PanelFocus::Timer;

    let (phase_label, phase_style) = match app.engine.phase() {
        TimerPhase::Running => ("running", palette.bold().fg(palette.success)),
        TimerPhase::Idle if app.engine.remaining_secs() == 0 => {
            ("done", palette.bold().fg(palette.warning))
        }
        TimerPhase::Idle => ("paused", palette.dimmed()),
    };

    let session_task = app
        .engine
        .selected_task()
        .and_then(|id| app.tasks.get(id))
        .map_or_else(
            || "no task selected".to_string(),
            |task| format!("focusing: {}", task.text),
        );

    let lines = vec![
        Line::from(Span::styled(
            format_mm_ss(app.engine.remaining_secs()),
            palette.bold(),
        )),
        Line::from(Span::styled(phase_label, phase_style)),
        Line::from(Span::styled(session_task, palette.dimmed())),
        Line::from(Span::styled(
            format!("next session: {} min", app.pending_minutes),
            palette.dimmed(),
        )),
        Line::from(Span::styled(
            "space start/pause  r reset  +/- minutes  enter set",
            palette.dimmed(),
        )),
    ];

    let block = Block::default()
        .title(Span::styled("Timer", palette.panel_title(palette.timer_title)))
        .borders(Borders::ALL)
        .border_style(palette.border(focused));

    frame.render_widget(Paragraph::new(lines).block(block).centered(), area);
}
