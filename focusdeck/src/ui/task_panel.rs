//! Task panel rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::app::{App, PanelFocus};
use crate::storage::KvStore;

use super::theme::Palette;

/// Render the task list in display order: incomplete tasks first, then
/// completed tasks sunk to the bottom.
pub fn render<S: KvStore>(frame: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let focused = app.focus == PanelFocus::Tasks;
    let selected_id = app.engine.selected_task();
    let display = app.tasks.display_order();
    let open_count = display.iter().filter(|t| !t.completed).count();

    let items: Vec<ListItem> = display
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let checkbox = if task.completed { "[\u{2713}]" } else { "[ ]" };
            let marker = if selected_id == Some(task.id) {
                "\u{25cf} "
            } else {
                "  "
            };

            let style = if focused && index == app.task_cursor {
                palette.selected()
            } else if task.completed {
                palette.dimmed()
            } else {
                palette.normal()
            };

            let line = Line::from(vec![
                Span::styled(marker, style),
                Span::styled(checkbox, style),
                Span::raw(" "),
                Span::styled(task.text.as_str(), style),
            ]);

            ListItem::new(line)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            format!("Tasks ({open_count} open)"),
            palette.panel_title(palette.tasks_title),
        ))
        .borders(Borders::ALL)
        .border_style(palette.border(focused));

    let list = if items.is_empty() {
        List::new([ListItem::new(Line::from(Span::styled(
            "no tasks yet — type one below",
            palette.dimmed(),
        )))])
    } else {
        List::new(items)
    };

    frame.render_widget(list.block(block), area);
}
