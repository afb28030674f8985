//! Integration tests for task persistence: write-through saves, restore,
//! duplicate-id repair, and corrupt-payload recovery.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use focusdeck::storage::{FileStore, KvStore, MemoryStore, TASKS_KEY, THEME_KEY};
use focusdeck::tasks::{DropPosition, TaskStore};
use focusdeck_model::task::{TaskId, encode_tasks};

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn memory_round_trip_reproduces_sequence() {
    let mut store = TaskStore::load(MemoryStore::new());
    store.add("alpha");
    store.add("beta");
    store.add("gamma");
    store.complete(TaskId::new(2));
    store.reorder(TaskId::new(3), TaskId::new(1), DropPosition::Above);

    let mut probe = MemoryStore::new();
    probe
        .set(TASKS_KEY, &encode_tasks(store.tasks()).unwrap())
        .unwrap();
    let restored = TaskStore::load(probe);

    assert_eq!(restored.tasks(), store.tasks());
}

#[test]
fn file_round_trip_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let file_store = FileStore::open(dir.path()).expect("open");
        let mut store = TaskStore::load(file_store);
        store.add("persisted task");
        store.add("another one");
        store.complete(TaskId::new(1));
    }

    // A fresh process: reopen the same directory.
    let file_store = FileStore::open(dir.path()).expect("reopen");
    let store = TaskStore::load(file_store);
    assert_eq!(store.len(), 2);
    assert_eq!(store.tasks()[0].text, "persisted task");
    assert!(store.tasks()[0].completed);
    assert!(!store.tasks()[1].completed);
}

#[test]
fn save_happens_before_mutation_returns() {
    // Simulates abrupt termination: after each mutating call the backing
    // entry already reflects the mutation, with no flush step in between.
    let dir = tempfile::tempdir().expect("tempdir");
    let file_store = FileStore::open(dir.path()).expect("open");
    let mut store = TaskStore::load(file_store);

    store.add("first");
    let on_disk = std::fs::read_to_string(dir.path().join(TASKS_KEY)).expect("written");
    assert!(on_disk.contains("first"));

    store.delete(TaskId::new(1));
    let on_disk = std::fs::read_to_string(dir.path().join(TASKS_KEY)).expect("written");
    assert_eq!(on_disk, "[]");
}

// ---------------------------------------------------------------------------
// First run and corrupt payloads
// ---------------------------------------------------------------------------

#[test]
fn first_run_with_no_entry_is_empty() {
    let store = TaskStore::load(MemoryStore::new());
    assert!(store.is_empty());
}

#[test]
fn unparsable_payload_recovers_to_empty() {
    for garbage in ["", "null-ish{", "<html>", "42", r#"{"id":1}"#] {
        let store = TaskStore::load(MemoryStore::with_entry(TASKS_KEY, garbage));
        assert!(store.is_empty(), "payload {garbage:?} should recover empty");
    }
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let raw = r#"[{"id":1,"text":"one","completed":false},
                  {"id":2,"text":"two","completed":false},
                  {"id":1,"text":"dup","completed":true}]"#;
    let store = TaskStore::load(MemoryStore::with_entry(TASKS_KEY, raw));

    assert_eq!(store.len(), 2);
    let first = store.get(TaskId::new(1)).expect("kept");
    assert_eq!(first.text, "one");
    assert!(!first.completed);
}

#[test]
fn dedup_is_idempotent_across_reload() {
    let raw = r#"[{"id":1,"text":"a","completed":false},
                  {"id":1,"text":"b","completed":false},
                  {"id":2,"text":"c","completed":false}]"#;
    let mut store = TaskStore::load(MemoryStore::with_entry(TASKS_KEY, raw));
    // Touch the store so the repaired payload is written back.
    store.add("d");

    let repaired = encode_tasks(store.tasks()).unwrap();
    let reloaded = TaskStore::load(MemoryStore::with_entry(TASKS_KEY, &repaired));
    assert_eq!(reloaded.tasks(), store.tasks());
}

// ---------------------------------------------------------------------------
// Id assignment across sessions
// ---------------------------------------------------------------------------

#[test]
fn restored_store_continues_above_highest_id() {
    let raw = r#"[{"id":7,"text":"left over","completed":false}]"#;
    let mut store = TaskStore::load(MemoryStore::with_entry(TASKS_KEY, raw));
    assert_eq!(store.add("new"), Some(TaskId::new(8)));
}

#[test]
fn ids_remain_distinct_through_churn() {
    let mut store = TaskStore::load(MemoryStore::new());
    for i in 0..20 {
        store.add(&format!("task {i}"));
    }
    // Delete every other task, including the highest.
    for id in (2..=20).step_by(2) {
        store.delete(TaskId::new(id));
    }
    for i in 0..5 {
        store.add(&format!("refill {i}"));
    }

    let ids: Vec<u64> = store.tasks().iter().map(|t| t.id.get()).collect();
    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
    // Refill ids continue past the deleted high-water mark.
    assert!(ids.contains(&21));
}

// ---------------------------------------------------------------------------
// Independent entries
// ---------------------------------------------------------------------------

#[test]
fn theme_entry_does_not_disturb_tasks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut theme_store = FileStore::open(dir.path()).expect("open");
    theme_store.set(THEME_KEY, "light").expect("set theme");

    let task_file = FileStore::open(dir.path()).expect("open");
    let mut store = TaskStore::load(task_file);
    store.add("unaffected");

    assert_eq!(theme_store.get(THEME_KEY).as_deref(), Some("light"));
    assert_eq!(store.len(), 1);
}
