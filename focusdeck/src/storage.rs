//! Key-value persistence backend.
//!
//! Defines the [`KvStore`] trait the task store and theme preference write
//! through, plus two implementations: [`FileStore`] (one UTF-8 file per key
//! under the user data directory) and [`MemoryStore`] (for tests).
//!
//! The layout is deliberately minimal: a `tasks` entry holding the
//! serialized task sequence and an independent `theme` entry holding the
//! last selected theme name. There is no schema version; readers tolerate
//! absent and malformed entries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key under which the serialized task sequence is stored.
pub const TASKS_KEY: &str = "tasks";

/// Key under which the last selected theme name is stored.
pub const THEME_KEY: &str = "theme";

/// Errors that can occur in the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Could not determine the user's data directory.
    #[error("could not determine data directory (no HOME or XDG_DATA_HOME)")]
    NoDataDir,

    /// Failed to create the backing directory.
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        /// Directory that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A write failed.
    #[error("failed to write key {key}: {source}")]
    Write {
        /// The key being written.
        key: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// A minimal string key-value store.
///
/// Reads are infallible by contract: a missing or unreadable entry is
/// `None`, and the caller recovers with its own default. Only writes can
/// fail, and callers are expected to log and carry on rather than abort.
pub trait KvStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value could not be durably written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store: one UTF-8 file per key inside a single directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store in the default location
    /// (`<data dir>/focusdeck`, e.g. `~/.local/share/focusdeck`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if no data directory can be determined or
    /// the directory cannot be created.
    pub fn open_default() -> Result<Self, StorageError> {
        let Some(data_dir) = dirs::data_dir() else {
            return Err(StorageError::NoDataDir);
        };
        Self::open(data_dir.join("focusdeck"))
    }

    /// Opens the store in an explicit directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CreateDir`] if the directory cannot be
    /// created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// The backing directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable storage entry, treating as absent");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.key_path(key), value).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a single entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
