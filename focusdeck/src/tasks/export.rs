//! CSV export of the task list.
//!
//! Produces the `ID,Task,Status` layout with one row per task in storage
//! order, status rendered as `Completed`/`Pending`, written to a
//! timestamped `tasks_export_*.csv` file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use focusdeck_model::task::TaskRecord;

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Failed to write the export file.
    #[error("failed to write export file {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Renders the task sequence as CSV.
///
/// Task text is always quoted, with embedded quotes doubled per RFC 4180.
#[must_use]
pub fn to_csv(tasks: &[TaskRecord]) -> String {
    let mut out = String::from("ID,Task,Status\n");
    for task in tasks {
        let status = if task.completed { "Completed" } else { "Pending" };
        let text = task.text.replace('"', "\"\"");
        out.push_str(&format!("{},\"{}\",{}\n", task.id, text, status));
    }
    out
}

/// File name for an export taken at `now`:
/// `tasks_export_YYYY-MM-DD-HH-MM-SS.csv`.
#[must_use]
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("tasks_export_{}.csv", now.format("%Y-%m-%d-%H-%M-%S"))
}

/// Writes a timestamped CSV export of `tasks` into `dir`.
///
/// # Errors
///
/// Returns [`ExportError::Write`] if the file cannot be written.
pub fn write_export(
    dir: &Path,
    tasks: &[TaskRecord],
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(now));
    std::fs::write(&path, to_csv(tasks)).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), count = tasks.len(), "exported task list");
    Ok(path)
}
