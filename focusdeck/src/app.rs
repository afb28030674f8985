//! Application state and event handling.
//!
//! `App` owns the two state machines (countdown engine, task store) plus
//! the presentation state around them. Key handling returns an optional
//! [`AppCommand`] when a user action needs work the main loop owns (quote
//! dispatch); the engine's completion signal flows the other way through
//! [`App::apply_completion`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use focusdeck_model::task::TaskId;

use crate::config::AppConfig;
use crate::quote::QuoteEvent;
use crate::storage::{KvStore, THEME_KEY};
use crate::tasks::{DropPosition, TaskStore};
use crate::timer::{TimerCompletion, TimerEngine};

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Task input box is focused (default).
    Input,
    /// Task list is focused.
    Tasks,
    /// Timer panel is focused.
    Timer,
}

/// Color scheme selection, persisted under the `theme` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    /// Dark scheme (default).
    #[default]
    Dark,
    /// Light scheme.
    Light,
}

impl ThemeKind {
    /// Parses a persisted theme name. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The persisted name of this theme.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Work the main loop performs on behalf of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Request a fresh quote from the background task.
    RefreshQuote,
}

/// Placeholder quote shown before the first refresh.
const IDLE_QUOTE: &str = "Press g for daily motivation! (Max 200/day)";

/// Main application state.
pub struct App<S: KvStore> {
    /// Countdown engine.
    pub engine: TimerEngine,
    /// Ordered task collection.
    pub tasks: TaskStore<S>,
    /// Store holding the persisted theme preference.
    theme_store: S,
    /// Active color scheme.
    pub theme: ThemeKind,
    /// Current text input.
    pub input: String,
    /// Cursor position in input (character index).
    pub cursor_position: usize,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Cursor into the display-ordered task list.
    pub task_cursor: usize,
    /// Minutes staged in the timer panel, applied with Enter.
    pub pending_minutes: u32,
    /// Latest quote text (or the error sentinel).
    pub quote: String,
    /// Fragments accumulated from a streaming quote response.
    quote_buffer: Option<String>,
    /// Whether a quote request is in flight.
    pub quote_loading: bool,
    /// Transient message for the status bar.
    pub status_message: Option<String>,
    /// Ring the terminal bell on the next frame.
    pub bell_pending: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<S: KvStore> App<S> {
    /// Creates the application around a loaded task store and a theme
    /// store, applying configured defaults.
    pub fn new(tasks: TaskStore<S>, theme_store: S, config: &AppConfig) -> Self {
        let mut engine = TimerEngine::new();
        engine.set_duration_mins(config.default_minutes);
        let theme = theme_store
            .get(THEME_KEY)
            .and_then(|name| ThemeKind::from_name(&name))
            .or_else(|| ThemeKind::from_name(&config.default_theme))
            .unwrap_or_default();

        Self {
            engine,
            tasks,
            theme_store,
            theme,
            input: String::new(),
            cursor_position: 0,
            focus: PanelFocus::Input,
            task_cursor: 0,
            pending_minutes: config.default_minutes,
            quote: IDLE_QUOTE.to_string(),
            quote_buffer: None,
            quote_loading: false,
            status_message: None,
            bell_pending: false,
            should_quit: false,
        }
    }

    // -----------------------------------------------------------------
    // Key handling
    // -----------------------------------------------------------------

    /// Handle a key event. `now_ms` is the wall clock the timer engine
    /// runs on; the caller owns it.
    pub fn handle_key_event(&mut self, key: KeyEvent, now_ms: u64) -> Option<AppCommand> {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return None;
            }
            (KeyCode::Tab, KeyModifiers::SHIFT) => {
                self.cycle_focus_backward();
                return None;
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.cycle_focus_forward();
                return None;
            }
            _ => {}
        }

        // Focus-specific shortcuts
        match self.focus {
            PanelFocus::Input => {
                self.handle_input_key(key);
                None
            }
            PanelFocus::Tasks => self.handle_tasks_key(key),
            PanelFocus::Timer => {
                self.handle_timer_key(key, now_ms);
                None
            }
        }
    }

    /// Handle key event when the input box is focused.
    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_task(),
            KeyCode::Char(c) => self.enter_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.input.chars().count(),
            _ => {}
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_tasks_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor_down(),
            KeyCode::Char('K') => self.move_task_up(),
            KeyCode::Char('J') => self.move_task_down(),
            KeyCode::Enter | KeyCode::Char('c') => self.complete_under_cursor(),
            KeyCode::Char('d') => self.delete_under_cursor(),
            KeyCode::Char('s') => self.toggle_select_under_cursor(),
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('g') => return self.request_quote(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        None
    }

    /// Handle key event when the timer panel is focused.
    fn handle_timer_key(&mut self, key: KeyEvent, now_ms: u64) {
        match key.code {
            KeyCode::Char(' ') => self.toggle_timer(now_ms),
            KeyCode::Char('r') => {
                self.engine.reset();
                self.status_message = Some("Timer reset".to_string());
            }
            KeyCode::Char('+' | '=') => self.pending_minutes = self.pending_minutes.saturating_add(1),
            KeyCode::Char('-') => self.pending_minutes = self.pending_minutes.saturating_sub(1).max(1),
            KeyCode::Enter => {
                self.engine.set_duration_mins(self.pending_minutes);
                self.status_message = Some(format!("Duration set to {} min", self.pending_minutes));
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    // -----------------------------------------------------------------
    // Timer actions
    // -----------------------------------------------------------------

    /// Start/pause toggle for the space key.
    fn toggle_timer(&mut self, now_ms: u64) {
        if self.engine.is_running() {
            self.engine.pause();
            self.status_message = Some("Paused".to_string());
        } else if self.engine.start(now_ms) {
            self.status_message = Some("Focus!".to_string());
        }
    }

    /// Applies an expiry signal: mark the carried task complete, queue the
    /// audio/visual cue, clear a now-stale selection.
    pub fn apply_completion(&mut self, completion: &TimerCompletion) {
        if let Some(id) = completion.completed_task_id {
            if self.tasks.complete(id) {
                let text = self
                    .tasks
                    .get(id)
                    .map_or_else(String::new, |t| t.text.clone());
                self.status_message = Some(format!("Session complete — finished: {text}"));
            }
            if self.engine.selected_task() == Some(id) {
                self.engine.select_task(None);
            }
        } else {
            self.status_message = Some("Session complete".to_string());
        }
        self.bell_pending = true;
        self.clamp_task_cursor();
    }

    // -----------------------------------------------------------------
    // Task actions
    // -----------------------------------------------------------------

    /// Submit the current input as a new task.
    fn submit_task(&mut self) {
        if self.tasks.add(&self.input).is_some() {
            self.input.clear();
            self.cursor_position = 0;
        }
    }

    /// Id of the task under the display cursor.
    #[must_use]
    pub fn task_under_cursor(&self) -> Option<TaskId> {
        self.tasks
            .display_order()
            .get(self.task_cursor)
            .map(|t| t.id)
    }

    fn complete_under_cursor(&mut self) {
        if let Some(id) = self.task_under_cursor() {
            if self.tasks.complete(id) && self.engine.selected_task() == Some(id) {
                self.engine.select_task(None);
            }
        }
    }

    fn delete_under_cursor(&mut self) {
        if let Some(id) = self.task_under_cursor() {
            if self.tasks.delete(id) {
                if self.engine.selected_task() == Some(id) {
                    self.engine.select_task(None);
                }
                self.clamp_task_cursor();
            }
        }
    }

    /// Selects the task under the cursor for the focus session, or clears
    /// the selection when it is already selected. Completed tasks are not
    /// selectable.
    fn toggle_select_under_cursor(&mut self) {
        let Some(id) = self.task_under_cursor() else {
            return;
        };
        if self.engine.selected_task() == Some(id) {
            self.engine.select_task(None);
            return;
        }
        if self.tasks.get(id).is_some_and(|t| !t.completed) {
            self.engine.select_task(Some(id));
            self.status_message = Some("Task will be marked complete when the timer ends".to_string());
        }
    }

    /// Moves the task under the cursor one slot up (above its display
    /// predecessor). The store enforces the reorder preconditions.
    fn move_task_up(&mut self) {
        if self.task_cursor == 0 {
            return;
        }
        let display: Vec<TaskId> = self.tasks.display_order().iter().map(|t| t.id).collect();
        let (Some(&source), Some(&target)) =
            (display.get(self.task_cursor), display.get(self.task_cursor - 1))
        else {
            return;
        };
        if self.tasks.reorder(source, target, DropPosition::Above) {
            self.task_cursor -= 1;
        }
    }

    /// Moves the task under the cursor one slot down (below its display
    /// successor).
    fn move_task_down(&mut self) {
        let display: Vec<TaskId> = self.tasks.display_order().iter().map(|t| t.id).collect();
        let (Some(&source), Some(&target)) =
            (display.get(self.task_cursor), display.get(self.task_cursor + 1))
        else {
            return;
        };
        if self.tasks.reorder(source, target, DropPosition::Below) {
            self.task_cursor += 1;
        }
    }

    fn cursor_up(&mut self) {
        self.task_cursor = self.task_cursor.saturating_sub(1);
    }

    fn cursor_down(&mut self) {
        if self.task_cursor + 1 < self.tasks.len() {
            self.task_cursor += 1;
        }
    }

    fn clamp_task_cursor(&mut self) {
        if self.task_cursor >= self.tasks.len() {
            self.task_cursor = self.tasks.len().saturating_sub(1);
        }
    }

    /// Exports the task list as CSV into the working directory.
    fn export_csv(&mut self) {
        let dir = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        match crate::tasks::export::write_export(&dir, self.tasks.tasks(), chrono::Utc::now()) {
            Ok(path) => self.status_message = Some(format!("Exported to {}", path.display())),
            Err(e) => {
                tracing::error!(error = %e, "csv export failed");
                self.status_message = Some("Export failed".to_string());
            }
        }
    }

    // -----------------------------------------------------------------
    // Theme
    // -----------------------------------------------------------------

    /// Flips between dark and light and persists the choice.
    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.theme_store.set(THEME_KEY, self.theme.name()) {
            tracing::warn!(error = %e, "theme preference save failed");
        }
    }

    // -----------------------------------------------------------------
    // Quote
    // -----------------------------------------------------------------

    /// Stages a quote refresh unless one is already in flight.
    fn request_quote(&mut self) -> Option<AppCommand> {
        if self.quote_loading {
            return None;
        }
        self.quote_loading = true;
        Some(AppCommand::RefreshQuote)
    }

    /// Applies a quote event from the background task.
    pub fn apply_quote_event(&mut self, event: QuoteEvent) {
        match event {
            QuoteEvent::Quote(quote) => {
                self.quote = quote;
                self.quote_buffer = None;
                self.quote_loading = false;
            }
            QuoteEvent::Fragment(fragment) => {
                let buffer = self.quote_buffer.get_or_insert_with(String::new);
                buffer.push_str(&fragment);
                // Live-render the partial quote as fragments land.
                self.quote.clone_from(buffer);
            }
            QuoteEvent::Done => {
                if let Some(buffer) = self.quote_buffer.take() {
                    self.quote = buffer;
                }
                self.quote_loading = false;
            }
            QuoteEvent::Failed(message) => {
                self.quote = message;
                self.quote_buffer = None;
                self.quote_loading = false;
            }
        }
    }

    // -----------------------------------------------------------------
    // Input editing
    // -----------------------------------------------------------------

    /// Byte offset of the character cursor.
    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input.len())
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        let index = self.byte_index();
        self.input.insert(index, c);
        self.cursor_position += 1;
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let index = self.byte_index();
        self.input.remove(index);
    }

    /// Move cursor left.
    const fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    /// Move cursor right.
    fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    // -----------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------

    /// Cycle focus forward: Input -> Tasks -> Timer -> Input.
    const fn cycle_focus_forward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Input => PanelFocus::Tasks,
            PanelFocus::Tasks => PanelFocus::Timer,
            PanelFocus::Timer => PanelFocus::Input,
        };
    }

    /// Cycle focus backward: Input -> Timer -> Tasks -> Input.
    const fn cycle_focus_backward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Input => PanelFocus::Timer,
            PanelFocus::Timer => PanelFocus::Tasks,
            PanelFocus::Tasks => PanelFocus::Input,
        };
    }
}
