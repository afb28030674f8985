//! The task store: add/delete/complete/reorder plus persistence.

use std::collections::HashSet;

use focusdeck_model::task::{TaskId, TaskRecord, decode_tasks, encode_tasks};

use crate::storage::{KvStore, TASKS_KEY};

/// Where a dragged task lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPosition {
    /// Insert immediately before the target.
    Above,
    /// Insert immediately after the target.
    #[default]
    Below,
}

/// Ordered task collection with write-through persistence.
///
/// The sequence is exclusively owned by the store; callers read through
/// accessor queries and mutate through the operations below. Every
/// successful mutation serializes the full sequence to the backing
/// [`KvStore`] before returning, so no mutation is observably lost if the
/// process dies right after a call returns.
#[derive(Debug)]
pub struct TaskStore<S: KvStore> {
    tasks: Vec<TaskRecord>,
    /// High-water mark for id assignment. Ids climb monotonically for the
    /// lifetime of the store and are never reassigned after a deletion,
    /// even when the deleted task held the highest id.
    next_id: u64,
    store: S,
}

impl<S: KvStore> TaskStore<S> {
    /// Loads the persisted task sequence from `store`.
    ///
    /// Recovery is total: a missing entry (first run) or an unparsable
    /// payload yields an empty collection, and duplicate ids left behind by
    /// a corrupted payload are repaired by keeping the first occurrence of
    /// each id. This constructor never fails.
    pub fn load(store: S) -> Self {
        let tasks = match store.get(TASKS_KEY) {
            None => Vec::new(),
            Some(raw) => match decode_tasks(&raw) {
                Ok(records) => dedup_first_wins(records),
                Err(e) => {
                    tracing::warn!(error = %e, "unparsable task payload, starting empty");
                    Vec::new()
                }
            },
        };
        let next_id = tasks.iter().map(|t| t.id.get()).max().map_or(1, |m| m + 1);
        Self {
            tasks,
            next_id,
            store,
        }
    }

    /// Adds a task at the tail and returns its id.
    ///
    /// Empty or whitespace-only text is rejected as a no-op (`None`).
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        if text.trim().is_empty() {
            return None;
        }
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        self.tasks.push(TaskRecord::new(id, text.to_string()));
        self.persist();
        Some(id)
    }

    /// Deletes the task with the given id. Returns whether anything changed.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.tasks.remove(index);
        self.persist();
        true
    }

    /// Marks the task completed. Idempotent: absent or already-completed
    /// ids are no-ops. Completion is terminal; there is no reopen.
    pub fn complete(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if task.completed {
            return false;
        }
        task.completed = true;
        self.persist();
        true
    }

    /// Moves `source` to sit immediately above or below `target`.
    ///
    /// Preconditions, checked in order, any failure being a no-op: both ids
    /// exist; `source != target`; neither task is completed (completed
    /// tasks are immovable and cannot be drop targets).
    ///
    /// The insertion index is computed against the post-removal sequence:
    /// when the source originally sat before the target, the target slides
    /// down one slot as the source comes out, and inserting at the
    /// pre-removal index would land one past where the user dropped.
    pub fn reorder(&mut self, source: TaskId, target: TaskId, position: DropPosition) -> bool {
        let Some(source_index) = self.index_of(source) else {
            return false;
        };
        let Some(target_index) = self.index_of(target) else {
            return false;
        };
        if source == target
            || self.tasks[source_index].completed
            || self.tasks[target_index].completed
        {
            return false;
        }

        let moved = self.tasks.remove(source_index);
        let target_index = if source_index < target_index {
            target_index - 1
        } else {
            target_index
        };
        let insert_at = match position {
            DropPosition::Above => target_index,
            DropPosition::Below => target_index + 1,
        };
        self.tasks.insert(insert_at, moved);
        self.persist();
        true
    }

    /// The full sequence in storage order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// The sequence in display order: incomplete tasks first, then
    /// completed tasks, relative order preserved within each group.
    ///
    /// A stable partition, not a resort — completing a task sinks it to
    /// the bottom without shuffling its neighbors.
    #[must_use]
    pub fn display_order(&self) -> Vec<&TaskRecord> {
        let (open, done): (Vec<&TaskRecord>, Vec<&TaskRecord>) =
            self.tasks.iter().partition(|t| !t.completed);
        open.into_iter().chain(done).collect()
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Write-through save, invoked by every mutating operation before it
    /// returns. Failures are logged and swallowed; losing one write must
    /// not take the session down.
    fn persist(&mut self) {
        match encode_tasks(&self.tasks) {
            Ok(payload) => {
                if let Err(e) = self.store.set(TASKS_KEY, &payload) {
                    tracing::error!(error = %e, "task save failed");
                }
            }
            Err(e) => tracing::error!(error = %e, "task payload encode failed"),
        }
    }
}

/// Keeps the first occurrence of each id, dropping later duplicates.
fn dedup_first_wins(records: Vec<TaskRecord>) -> Vec<TaskRecord> {
    let mut seen = HashSet::new();
    let before = records.len();
    let records: Vec<TaskRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .collect();
    if records.len() < before {
        tracing::warn!(
            dropped = before - records.len(),
            "dropped duplicate task ids from persisted payload"
        );
    }
    records
}
