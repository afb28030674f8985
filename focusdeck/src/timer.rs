//! Drift-corrected countdown engine.
//!
//! The engine never counts ticks. While running it holds an absolute
//! `target_end_ms` wall-clock timestamp, and every `tick`/`resync`
//! recomputes the remaining time from that target. Arbitrary delays between
//! ticks (throttled callbacks, laptop suspend, SIGSTOP) therefore
//! self-correct: the next recomputation lands on the right value no matter
//! how many ticks were missed.
//!
//! The engine owns no side effects. Expiry is reported as a one-shot
//! [`TimerCompletion`] return value; the caller decides what marking a task
//! complete or ringing a bell looks like.

use focusdeck_model::task::TaskId;

/// Default session length: 25 minutes.
pub const DEFAULT_DURATION_SECS: u32 = 1500;

/// Observable phase of the countdown.
///
/// Expiry is transient: the instant remaining time reaches zero while
/// running, the engine is already back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Not counting down. Remaining time may be nonzero.
    Idle,
    /// Counting down toward the target timestamp.
    Running,
}

/// One-shot completion signal, produced at most once per expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerCompletion {
    /// The task that was selected at the moment the session started, if any.
    pub completed_task_id: Option<TaskId>,
}

/// Countdown state machine with wall-clock drift correction.
///
/// All time-dependent methods take an explicit `now_ms` (milliseconds since
/// epoch) supplied by the caller, so the host loop owns the clock and tests
/// can replay any tick schedule.
#[derive(Debug)]
pub struct TimerEngine {
    /// Configured session length in seconds.
    duration_secs: u32,
    /// Last computed remaining time, in `[0, duration_secs]`.
    remaining_secs: u32,
    /// Absolute end timestamp; present iff the engine is running.
    target_end_ms: Option<u64>,
    /// Foreign key into the task store; purely a reference.
    selected_task: Option<TaskId>,
    /// Selection snapshot taken at `start()`, carried by the completion
    /// signal. Selection changes mid-session do not retroactively change
    /// which task a session completes.
    armed_task: Option<TaskId>,
}

impl TimerEngine {
    /// Creates an idle engine with the default 25-minute duration.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_duration_secs(DEFAULT_DURATION_SECS)
    }

    /// Creates an idle engine with the given duration in seconds.
    #[must_use]
    pub const fn with_duration_secs(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            target_end_ms: None,
            selected_task: None,
            armed_task: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TimerPhase {
        if self.target_end_ms.is_some() {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }

    /// Whether the engine is counting down.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.target_end_ms.is_some()
    }

    /// Last computed remaining time in seconds.
    #[must_use]
    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Configured session length in seconds.
    #[must_use]
    pub const fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// The currently selected task reference, if any.
    #[must_use]
    pub const fn selected_task(&self) -> Option<TaskId> {
        self.selected_task
    }

    /// Points the engine at a task (or clears the selection with `None`).
    ///
    /// Selection is a foreign key only; it does not affect a session that
    /// is already running.
    pub const fn select_task(&mut self, task: Option<TaskId>) {
        self.selected_task = task;
    }

    /// Starts the countdown. Legal from `Idle` with nonzero remaining time.
    ///
    /// Sets the absolute target to `now + remaining` and snapshots the
    /// current task selection for the eventual completion signal. Returns
    /// `false` (no-op) if already running or nothing remains.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running() || self.remaining_secs == 0 {
            return false;
        }
        self.target_end_ms = Some(now_ms + u64::from(self.remaining_secs) * 1000);
        self.armed_task = self.selected_task;
        tracing::debug!(
            remaining_secs = self.remaining_secs,
            task = ?self.armed_task,
            "timer started"
        );
        true
    }

    /// Pauses the countdown. Legal from `Running`; otherwise a no-op.
    ///
    /// Clears the target; `remaining_secs` retains its last computed value.
    pub fn pause(&mut self) {
        if self.target_end_ms.take().is_some() {
            self.armed_task = None;
            tracing::debug!(remaining_secs = self.remaining_secs, "timer paused");
        }
    }

    /// Resets to a full idle session. Legal from any state.
    pub const fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.target_end_ms = None;
        self.armed_task = None;
    }

    /// Sets a new duration in minutes, clamped to at least one minute.
    ///
    /// Implicitly pauses: the engine is idle afterwards with a full
    /// `remaining_secs`. Does not auto-start.
    pub const fn set_duration_mins(&mut self, minutes: u32) {
        let minutes = if minutes == 0 { 1 } else { minutes };
        self.duration_secs = minutes * 60;
        self.remaining_secs = self.duration_secs;
        self.target_end_ms = None;
        self.armed_task = None;
    }

    /// Periodic tick. A no-op unless running.
    ///
    /// Recomputes `remaining = max(0, ceil((target - now) / 1000))` from the
    /// absolute target rather than decrementing, so any delay between ticks
    /// self-corrects. Returns the one-shot completion signal when the
    /// recomputation hits zero.
    pub fn tick(&mut self, now_ms: u64) -> Option<TimerCompletion> {
        let target_end_ms = self.target_end_ms?;

        self.remaining_secs = remaining_at(target_end_ms, now_ms, self.duration_secs);
        if self.remaining_secs > 0 {
            return None;
        }

        // Expired: back to idle before the signal leaves, so a late tick
        // can never observe a running-but-finished engine and re-fire.
        self.target_end_ms = None;
        let completed_task_id = self.armed_task.take();
        tracing::info!(task = ?completed_task_id, "timer expired");
        Some(TimerCompletion { completed_task_id })
    }

    /// Resynchronizes after the host reports that callback delivery may
    /// have been suspended (terminal unfrozen, machine resumed).
    ///
    /// Same absolute recomputation as [`tick`](Self::tick); kept separate so
    /// call sites read as what they are and the gap gets logged.
    pub fn resync(&mut self, now_ms: u64) -> Option<TimerCompletion> {
        if self.is_running() {
            tracing::debug!(now_ms, "resyncing timer after suspended ticks");
        }
        self.tick(now_ms)
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// The engine itself never reads the clock; the host loop calls this and
/// passes the value in, so tests can drive any schedule they like.
#[must_use]
pub fn now_ms() -> u64 {
    u64::try_from(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}

/// Remaining whole seconds until `target_end_ms`, clamped to
/// `[0, duration_secs]`.
///
/// The upper clamp covers wall clocks that jump backwards; the countdown
/// never reads longer than the configured session.
fn remaining_at(target_end_ms: u64, now_ms: u64, duration_secs: u32) -> u32 {
    if now_ms >= target_end_ms {
        return 0;
    }
    let secs = (target_end_ms - now_ms).div_ceil(1000);
    u32::try_from(secs).unwrap_or(u32::MAX).min(duration_secs)
}
