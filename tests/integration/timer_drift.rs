//! Integration tests for the drift-corrected countdown engine.
//!
//! Covers the absolute-recomputation contract (arbitrary tick gaps land on
//! `duration - floor(elapsed)`), one-shot expiry, in-flight ticks after
//! pause, and the suspension scenario.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use focusdeck::timer::{TimerEngine, TimerPhase};
use focusdeck_model::task::TaskId;

/// Creates a started engine with the given duration, t=0 start.
fn running_engine(duration_secs: u32) -> TimerEngine {
    let mut engine = TimerEngine::with_duration_secs(duration_secs);
    assert!(engine.start(0));
    engine
}

// ---------------------------------------------------------------------------
// Drift correction
// ---------------------------------------------------------------------------

#[test]
fn remaining_depends_only_on_elapsed_wall_clock() {
    // Three engines, same total elapsed time, radically different tick
    // schedules: a regular 1 Hz feed, a throttled feed, and a single
    // final tick.
    let schedules: [&[u64]; 3] = [
        &[1_000, 2_000, 3_000, 4_000, 5_000, 6_000, 7_000],
        &[4_900, 5_100, 7_000],
        &[7_000],
    ];

    for schedule in schedules {
        let mut engine = running_engine(60);
        for &now in schedule {
            engine.tick(now);
        }
        assert_eq!(engine.remaining_secs(), 53, "schedule {schedule:?}");
    }
}

#[test]
fn sub_second_jitter_rounds_up_not_down() {
    let mut engine = running_engine(60);
    // 1.001s elapsed: one whole second gone, ceil keeps the partial one.
    engine.tick(1_001);
    assert_eq!(engine.remaining_secs(), 59);
    // 1.999s elapsed: still only one whole second gone.
    let mut engine = running_engine(60);
    engine.tick(1_999);
    assert_eq!(engine.remaining_secs(), 59);
}

#[test]
fn late_expiry_tick_clamps_to_zero() {
    let mut engine = running_engine(5);
    let completion = engine.tick(500_000);
    assert!(completion.is_some());
    assert_eq!(engine.remaining_secs(), 0);
}

// ---------------------------------------------------------------------------
// Expiry fires exactly once
// ---------------------------------------------------------------------------

#[test]
fn expiry_signal_is_one_shot() {
    let mut engine = running_engine(3);
    assert!(engine.tick(3_000).is_some());
    for now in [3_001, 4_000, 10_000, 1_000_000] {
        assert!(engine.tick(now).is_none());
        assert!(engine.resync(now).is_none());
    }
}

#[test]
fn restarting_after_expiry_requires_reset_or_new_duration() {
    let mut engine = running_engine(3);
    engine.tick(3_000);
    // Nothing remains, so start is rejected...
    assert!(!engine.start(4_000));
    // ...until the engine is reset.
    engine.reset();
    assert!(engine.start(5_000));
    assert_eq!(engine.phase(), TimerPhase::Running);
}

// ---------------------------------------------------------------------------
// In-flight ticks after a synchronous stop
// ---------------------------------------------------------------------------

#[test]
fn tick_queued_before_pause_lands_harmlessly_after() {
    let mut engine = running_engine(300);
    engine.tick(5_000);
    engine.pause();
    // The periodic source fires once more before it is torn down.
    assert!(engine.tick(6_000).is_none());
    assert_eq!(engine.remaining_secs(), 295);
    assert_eq!(engine.phase(), TimerPhase::Idle);
}

#[test]
fn tick_after_reset_is_noop() {
    let mut engine = running_engine(300);
    engine.tick(5_000);
    engine.reset();
    assert!(engine.tick(6_000).is_none());
    assert_eq!(engine.remaining_secs(), 300);
}

// ---------------------------------------------------------------------------
// Suspension scenario
// ---------------------------------------------------------------------------

#[test]
fn suspension_scenario_from_selected_start() {
    let mut engine = TimerEngine::with_duration_secs(5);
    engine.select_task(Some(TaskId::new(11)));
    assert!(engine.start(0));

    // Regular ticks for three seconds.
    assert!(engine.tick(1_000).is_none());
    assert!(engine.tick(2_000).is_none());
    assert!(engine.tick(3_000).is_none());
    assert_eq!(engine.remaining_secs(), 2);

    // Selection changes mid-session must not retarget the completion.
    engine.select_task(Some(TaskId::new(99)));

    // Host suspends; the next signal is a resync well past the target.
    let completion = engine.resync(10_000).expect("completion fires");
    assert_eq!(completion.completed_task_id, Some(TaskId::new(11)));
    assert_eq!(engine.remaining_secs(), 0);
    assert_eq!(engine.phase(), TimerPhase::Idle);

    // Exactly once.
    assert!(engine.resync(11_000).is_none());
    assert!(engine.tick(12_000).is_none());
}

#[test]
fn hour_long_suspension_recovers_in_one_resync() {
    let mut engine = running_engine(1500);
    engine.tick(60_000);
    assert_eq!(engine.remaining_secs(), 1440);

    let completion = engine.resync(3 * 60 * 60 * 1000);
    assert!(completion.is_some());
    assert_eq!(engine.remaining_secs(), 0);
}

#[test]
fn short_suspension_resyncs_without_expiry() {
    let mut engine = running_engine(1500);
    engine.tick(60_000);
    // Two minutes of missed ticks, session still has time left.
    assert!(engine.resync(180_000).is_none());
    assert_eq!(engine.remaining_secs(), 1320);
    assert_eq!(engine.phase(), TimerPhase::Running);
}
