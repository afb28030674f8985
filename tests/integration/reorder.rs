//! Integration tests for identity-based reordering.
//!
//! Exercises the drop-position matrix, the post-removal index adjustment,
//! completed-task immovability, and the display-order stable partition.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use focusdeck::storage::MemoryStore;
use focusdeck::tasks::{DropPosition, TaskStore};
use focusdeck_model::task::TaskId;

/// Builds a store containing tasks A..N, ids 1..=N, all incomplete.
fn store_of(texts: &[&str]) -> TaskStore<MemoryStore> {
    let mut store = TaskStore::load(MemoryStore::new());
    for text in texts {
        store.add(text);
    }
    store
}

fn order(store: &TaskStore<MemoryStore>) -> Vec<&str> {
    store.tasks().iter().map(|t| t.text.as_str()).collect()
}

fn id(n: u64) -> TaskId {
    TaskId::new(n)
}

// ---------------------------------------------------------------------------
// Drop-position matrix over [A, B, C, D]
// ---------------------------------------------------------------------------

#[test]
fn forward_move_below_target() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    assert!(store.reorder(id(1), id(3), DropPosition::Below));
    assert_eq!(order(&store), vec!["B", "C", "A", "D"]);
}

#[test]
fn backward_move_above_target() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    assert!(store.reorder(id(4), id(1), DropPosition::Above));
    assert_eq!(order(&store), vec!["D", "A", "B", "C"]);
}

#[test]
fn forward_move_above_target() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    assert!(store.reorder(id(1), id(4), DropPosition::Above));
    assert_eq!(order(&store), vec!["B", "C", "A", "D"]);
}

#[test]
fn backward_move_below_target() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    assert!(store.reorder(id(3), id(1), DropPosition::Below));
    assert_eq!(order(&store), vec!["A", "C", "B", "D"]);
}

#[test]
fn default_drop_position_is_below() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    assert!(store.reorder(id(1), id(3), DropPosition::default()));
    assert_eq!(order(&store), vec!["B", "C", "A", "D"]);
}

#[test]
fn adjacent_swap_both_directions() {
    let mut store = store_of(&["A", "B"]);
    assert!(store.reorder(id(1), id(2), DropPosition::Below));
    assert_eq!(order(&store), vec!["B", "A"]);
    assert!(store.reorder(id(1), id(2), DropPosition::Above));
    assert_eq!(order(&store), vec!["A", "B"]);
}

#[test]
fn move_to_extremes() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    // Head: above the first task.
    assert!(store.reorder(id(3), id(1), DropPosition::Above));
    assert_eq!(order(&store), vec!["C", "A", "B", "D"]);
    // Tail: below the last task.
    assert!(store.reorder(id(3), id(4), DropPosition::Below));
    assert_eq!(order(&store), vec!["A", "B", "D", "C"]);
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[test]
fn unknown_source_or_target_is_noop() {
    let mut store = store_of(&["A", "B", "C"]);
    assert!(!store.reorder(id(42), id(2), DropPosition::Below));
    assert!(!store.reorder(id(2), id(42), DropPosition::Below));
    assert_eq!(order(&store), vec!["A", "B", "C"]);
}

#[test]
fn self_target_is_noop() {
    let mut store = store_of(&["A", "B", "C"]);
    assert!(!store.reorder(id(2), id(2), DropPosition::Above));
    assert_eq!(order(&store), vec!["A", "B", "C"]);
}

#[test]
fn completed_tasks_are_immovable_and_untargetable() {
    let mut store = store_of(&["A", "B", "C"]);
    store.complete(id(2));
    // Completed source.
    assert!(!store.reorder(id(2), id(3), DropPosition::Below));
    // Completed target.
    assert!(!store.reorder(id(1), id(2), DropPosition::Below));
    assert_eq!(order(&store), vec!["A", "B", "C"]);
}

#[test]
fn reorder_still_works_around_completed_tasks() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    store.complete(id(2));
    // Incomplete tasks can still move relative to each other.
    assert!(store.reorder(id(1), id(4), DropPosition::Below));
    assert_eq!(order(&store), vec!["B", "C", "D", "A"]);
}

// ---------------------------------------------------------------------------
// Display-order stable partition
// ---------------------------------------------------------------------------

#[test]
fn completed_tasks_sink_preserving_relative_order() {
    let mut store = store_of(&["A", "B", "C", "D", "E"]);
    store.complete(id(2));
    store.complete(id(4));

    let display: Vec<&str> = store
        .display_order()
        .into_iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(display, vec!["A", "C", "E", "B", "D"]);
}

#[test]
fn display_partition_tracks_reorders() {
    let mut store = store_of(&["A", "B", "C", "D"]);
    store.complete(id(1));
    store.reorder(id(4), id(2), DropPosition::Above);

    let display: Vec<&str> = store
        .display_order()
        .into_iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(display, vec!["D", "B", "C", "A"]);
    // Underlying storage keeps the completed task in place.
    assert_eq!(order(&store), vec!["A", "D", "B", "C"]);
}
