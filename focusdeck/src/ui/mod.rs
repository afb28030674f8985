//! Terminal UI rendering.

pub mod input_panel;
pub mod quote_panel;
pub mod status_bar;
pub mod task_panel;
pub mod theme;
pub mod timer_panel;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;
use crate::storage::KvStore;
use self::theme::Palette;

/// Main draw function for the entire UI.
pub fn draw<S: KvStore>(frame: &mut Frame, app: &App<S>) {
    let palette = Palette::of(app.theme);

    // Quote box on top, content in the middle, input and status at the
    // bottom.
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    // Timer on the left, task list on the right.
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    quote_panel::render(frame, main_chunks[0], app, &palette);
    timer_panel::render(frame, content_chunks[0], app, &palette);
    task_panel::render(frame, content_chunks[1], app, &palette);
    input_panel::render(frame, main_chunks[2], app, &palette);
    status_bar::render(frame, main_chunks[3], app, &palette);
}
