//! Property-based tests for the task store and the countdown engine.
//!
//! Uses proptest to verify:
//! 1. Id uniqueness holds for every sequence of add/delete/complete/reorder
//!    operations, and deleted ids are never reassigned.
//! 2. Reordering permutes the collection without gaining or losing tasks.
//! 3. Deduplication on load is idempotent.
//! 4. Drift correction: the remaining time after any tick schedule depends
//!    only on total elapsed wall-clock time, and expiry fires at most once.

use std::collections::HashSet;

use proptest::prelude::*;

use focusdeck::storage::{MemoryStore, TASKS_KEY};
use focusdeck::tasks::{DropPosition, TaskStore};
use focusdeck::timer::TimerEngine;
use focusdeck_model::task::{TaskId, TaskRecord, encode_tasks};

// --- Strategies ---

/// One task store operation, with small id values so that operations
/// frequently hit existing tasks.
#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Delete(u64),
    Complete(u64),
    Reorder(u64, u64, bool),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(Op::Add),
        (1..40u64).prop_map(Op::Delete),
        (1..40u64).prop_map(Op::Complete),
        (1..40u64, 1..40u64, any::<bool>()).prop_map(|(s, t, below)| Op::Reorder(s, t, below)),
    ]
}

fn apply(store: &mut TaskStore<MemoryStore>, op: &Op) {
    match op {
        Op::Add(text) => {
            store.add(text);
        }
        Op::Delete(id) => {
            store.delete(TaskId::new(*id));
        }
        Op::Complete(id) => {
            store.complete(TaskId::new(*id));
        }
        Op::Reorder(source, target, below) => {
            let position = if *below {
                DropPosition::Below
            } else {
                DropPosition::Above
            };
            store.reorder(TaskId::new(*source), TaskId::new(*target), position);
        }
    }
}

proptest! {
    #[test]
    fn ids_stay_unique_and_deleted_ids_stay_dead(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut store = TaskStore::load(MemoryStore::new());
        let mut ever_deleted: HashSet<u64> = HashSet::new();

        for op in &ops {
            if let Op::Delete(id) = op {
                if store.get(TaskId::new(*id)).is_some() {
                    ever_deleted.insert(*id);
                }
            }
            apply(&mut store, op);

            let ids: Vec<u64> = store.tasks().iter().map(|t| t.id.get()).collect();
            let unique: HashSet<u64> = ids.iter().copied().collect();
            prop_assert_eq!(ids.len(), unique.len(), "duplicate ids after {:?}", op);
            for dead in &ever_deleted {
                prop_assert!(!unique.contains(dead), "deleted id {} resurrected", dead);
            }
        }
    }

    #[test]
    fn reorder_is_a_permutation(
        count in 2..10u64,
        source in 1..10u64,
        target in 1..10u64,
        below in any::<bool>(),
    ) {
        let mut store = TaskStore::load(MemoryStore::new());
        for i in 0..count {
            store.add(&format!("task {i}"));
        }
        let before: HashSet<u64> = store.tasks().iter().map(|t| t.id.get()).collect();

        let position = if below { DropPosition::Below } else { DropPosition::Above };
        store.reorder(TaskId::new(source), TaskId::new(target), position);

        let after: HashSet<u64> = store.tasks().iter().map(|t| t.id.get()).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(store.len(), usize::try_from(count).unwrap());
    }

    #[test]
    fn dedup_on_load_is_idempotent(
        ids in prop::collection::vec(1..8u64, 0..24),
    ) {
        // Payload with plenty of duplicate ids.
        let records: Vec<TaskRecord> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| TaskRecord::new(TaskId::new(*id), format!("task {i}")))
            .collect();
        let payload = encode_tasks(&records).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let first = TaskStore::load(MemoryStore::with_entry(TASKS_KEY, &payload));
        let unique: HashSet<u64> = ids.iter().copied().collect();
        prop_assert_eq!(first.len(), unique.len());

        // Loading the repaired sequence changes nothing further.
        let repaired = encode_tasks(first.tasks()).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = TaskStore::load(MemoryStore::with_entry(TASKS_KEY, &repaired));
        prop_assert_eq!(second.tasks(), first.tasks());
    }

    #[test]
    fn remaining_depends_only_on_elapsed_time(
        duration_secs in 1..3600u32,
        mut ticks in prop::collection::vec(0..4_000_000u64, 1..40),
    ) {
        ticks.sort_unstable();
        let mut engine = TimerEngine::with_duration_secs(duration_secs);
        prop_assert!(engine.start(0));

        let mut completions = 0u32;
        for &now in &ticks {
            if engine.tick(now).is_some() {
                completions += 1;
            }
        }

        let last = *ticks.last().unwrap();
        let elapsed_whole_secs = u32::try_from(last / 1000).unwrap_or(u32::MAX);
        let expected = duration_secs.saturating_sub(elapsed_whole_secs);
        prop_assert_eq!(engine.remaining_secs(), expected);
        prop_assert!(completions <= 1, "expiry fired {} times", completions);
        if expected == 0 {
            prop_assert_eq!(completions, 1);
        }
    }
}
