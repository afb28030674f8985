//! Property-based tests for the persisted task payload.
//!
//! Uses proptest to verify:
//! 1. Any valid task sequence survives encode → decode round-trip.
//! 2. Arbitrary junk never causes a panic in `decode_tasks` (returns `Err`
//!    or a valid sequence, gracefully).
//! 3. Encoding is deterministic.

use proptest::prelude::*;

use focusdeck_model::task::{TaskId, TaskRecord, decode_tasks, encode_tasks};

// --- Strategies for record types ---

/// Strategy for generating arbitrary `TaskId` values.
fn arb_task_id() -> impl Strategy<Value = TaskId> {
    any::<u64>().prop_map(TaskId::new)
}

/// Strategy for generating arbitrary task text (non-empty, any unicode
/// except NUL).
fn arb_text() -> impl Strategy<Value = String> {
    "[^\x00]{1,64}"
}

/// Strategy for generating arbitrary `TaskRecord` values.
fn arb_record() -> impl Strategy<Value = TaskRecord> {
    (arb_task_id(), arb_text(), any::<bool>()).prop_map(|(id, text, completed)| {
        let mut record = TaskRecord::new(id, text);
        record.completed = completed;
        record
    })
}

/// Strategy for generating arbitrary record sequences.
fn arb_sequence() -> impl Strategy<Value = Vec<TaskRecord>> {
    prop::collection::vec(arb_record(), 0..32)
}

proptest! {
    #[test]
    fn round_trip_preserves_sequence(tasks in arb_sequence()) {
        let encoded = encode_tasks(&tasks).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let decoded = decode_tasks(&encoded).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded, tasks);
    }

    #[test]
    fn decode_never_panics_on_junk(raw in "\\PC{0,256}") {
        // Any outcome is fine as long as it is a Result, not a panic.
        let _ = decode_tasks(&raw);
    }

    #[test]
    fn decode_never_panics_on_near_valid_json(
        ids in prop::collection::vec(any::<u64>(), 0..8),
    ) {
        // Truncated version of a valid payload.
        let tasks: Vec<TaskRecord> = ids
            .into_iter()
            .map(|id| TaskRecord::new(TaskId::new(id), "x".to_string()))
            .collect();
        if let Ok(encoded) = encode_tasks(&tasks) {
            for cut in 0..encoded.len().min(16) {
                let _ = decode_tasks(&encoded[..encoded.len() - cut]);
            }
        }
    }

    #[test]
    fn encoding_is_deterministic(tasks in arb_sequence()) {
        let first = encode_tasks(&tasks).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = encode_tasks(&tasks).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(first, second);
    }
}
