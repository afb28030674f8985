//! Persisted task records for Focusdeck.
//!
//! Defines the task identifier and record types plus the JSON encode/decode
//! functions for the persisted payload: an ordered list of
//! `{id, text, completed}` records stored under a single key-value entry.
//! The payload carries no schema version; the loader is expected to treat
//! malformed content as an empty collection.

use serde::{Deserialize, Serialize};

/// Unique identifier for a task.
///
/// Ids are assigned monotonically by the owning store (`max(existing) + 1`)
/// and are never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from a raw integer value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task in the persisted sequence.
///
/// `completed` transitions one way only (false to true); the position of the
/// record in the owning sequence IS its rank, so there is no separate
/// priority field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique, monotonically assigned identifier.
    pub id: TaskId,
    /// User-supplied task text (non-empty at creation).
    pub text: String,
    /// Whether the task has been completed.
    pub completed: bool,
}

impl TaskRecord {
    /// Creates a new incomplete task record.
    #[must_use]
    pub const fn new(id: TaskId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }
}

/// Error type for task payload encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Encodes a task sequence into its persisted JSON payload.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the records cannot be serialized.
pub fn encode_tasks(tasks: &[TaskRecord]) -> Result<String, CodecError> {
    serde_json::to_string(tasks).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a task sequence from its persisted JSON payload.
///
/// Decoding does not deduplicate: repairing duplicate ids in a corrupted
/// payload is the loading store's job, so the first-occurrence-wins rule
/// lives next to the uniqueness invariant it protects.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the payload cannot be parsed.
pub fn decode_tasks(raw: &str) -> Result<Vec<TaskRecord>, CodecError> {
    serde_json::from_str(raw).map_err(|e| CodecError::Serialization(e.to_string()))
}
