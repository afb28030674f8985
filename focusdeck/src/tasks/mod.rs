//! Ordered task collection with identity-based reordering and
//! write-through persistence.
//!
//! Positions are derived, ids are canonical: every operation addresses
//! tasks by [`TaskId`](focusdeck_model::task::TaskId), never by raw index,
//! so a stale view can never move the wrong task. Invalid input (empty
//! text, unknown ids, completed participants) is rejected as a silent
//! no-op rather than an error.

pub mod export;
pub mod store;

pub use store::{DropPosition, TaskStore};
