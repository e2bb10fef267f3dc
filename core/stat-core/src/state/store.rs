//! File-backed per-pane state persistence.
//!
//! Each pane owns one file, `<state_dir>/<key>.state`, so writers for different
//! panes never contend. Display scripts read these files concurrently with the
//! hook handler and the telemetry receiver.
//!
//! # Atomic Writes
//!
//! Every write goes to a temp file in the same directory and is renamed over
//! the record. Readers see either the old record or the new one, never a torn
//! document; concurrent writers to the same key resolve as last-write-wins.
//!
//! # Staleness
//!
//! A record older than the threshold is reported as absent and deleted on the
//! way out. The age is re-read from disk right before deletion so a fresh
//! write that landed mid-sweep survives.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs_err as fs;
use tempfile::Builder;

use crate::classify::message::truncate_message;
use crate::error::{Result, StatError};
use crate::types::Status;

use super::types::{session_key, StateRecord, RECORD_EXTENSION, STALE_THRESHOLD_SECS};

/// Handle to a state directory.
///
/// Cheap to clone; holds no open files.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Creates a handle without touching the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        StateStore { dir: dir.into() }
    }

    /// Creates a handle and makes sure the directory exists.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir)
            .map_err(|e| StatError::io("Failed to create state directory", e))?;
        Ok(store)
    }

    /// Path of the record file for a pane id or key.
    pub fn record_path(&self, pane_id: &str) -> Result<PathBuf> {
        let key = session_key(pane_id)?;
        Ok(self.dir.join(format!("{key}.{RECORD_EXTENSION}")))
    }

    /// Writes a record stamped with the current time and returns it.
    pub fn write(
        &self,
        pane_id: &str,
        status: Status,
        conversation_id: &str,
        partition_key: &str,
        message: &str,
    ) -> Result<StateRecord> {
        let record = StateRecord {
            session_key: session_key(pane_id)?,
            status,
            timestamp: Utc::now().timestamp(),
            conversation_id: conversation_id.to_string(),
            partition_key: partition_key.to_string(),
            message: truncate_message(message),
        };
        self.put(&record)?;
        Ok(record)
    }

    /// Atomically replaces the record stored under `record.session_key`.
    pub fn put(&self, record: &StateRecord) -> Result<()> {
        let path = self.record_path(&record.session_key)?;
        fs::create_dir_all(&self.dir)
            .map_err(|e| StatError::io("Failed to create state directory", e))?;

        let content = serde_json::to_vec(record).map_err(|e| StatError::Json {
            context: format!("serialize record {}", record.session_key),
            source: e,
        })?;

        let mut temp_file = Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| StatError::io("Failed to create temp state file", e))?;
        temp_file
            .write_all(&content)
            .map_err(|e| StatError::io("Failed to write temp state file", e))?;
        temp_file
            .flush()
            .map_err(|e| StatError::io("Failed to flush temp state file", e))?;
        temp_file.persist(&path).map_err(|e| StatError::Persist {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::debug!(
            session_key = %record.session_key,
            status = %record.status,
            "State record written"
        );
        Ok(())
    }

    /// Reads a live record, evicting it if stale.
    pub fn read(&self, pane_id: &str) -> Option<StateRecord> {
        self.read_at(pane_id, Utc::now().timestamp(), STALE_THRESHOLD_SECS)
    }

    pub fn read_at(&self, pane_id: &str, now: i64, threshold_secs: i64) -> Option<StateRecord> {
        let path = self.record_path(pane_id).ok()?;
        let record = load_record(&path)?;
        if record.is_stale_at(now, threshold_secs) {
            evict_if_stale(&path, now, threshold_secs);
            return None;
        }
        Some(record)
    }

    /// Deletes a record. Returns whether a file was removed.
    pub fn remove(&self, pane_id: &str) -> Result<bool> {
        let path = self.record_path(pane_id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "State record removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StatError::io("Failed to remove state file", e)),
        }
    }

    /// Lists every live record, deleting stale ones as a side effect.
    ///
    /// A missing directory is an empty store. Sorted by session key.
    pub fn enumerate(&self, threshold_secs: i64) -> Vec<StateRecord> {
        self.enumerate_at(Utc::now().timestamp(), threshold_secs)
    }

    pub fn enumerate_at(&self, now: i64, threshold_secs: i64) -> Vec<StateRecord> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list state directory");
                return Vec::new();
            }
        };

        let mut records: Vec<StateRecord> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == RECORD_EXTENSION))
            .filter_map(|path| {
                let record = load_record(&path)?;
                if record.is_stale_at(now, threshold_secs) {
                    evict_if_stale(&path, now, threshold_secs);
                    None
                } else {
                    Some(record)
                }
            })
            .collect();

        records.sort_by(|a, b| a.session_key.cmp(&b.session_key));
        records
    }
}

/// Loads a record, filling `session_key` from the file stem.
///
/// Missing, empty, or corrupt files read as absent.
fn load_record(path: &Path) -> Option<StateRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read state file");
            return None;
        }
    };

    if content.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<StateRecord>(&content) {
        Ok(mut record) => {
            record.session_key = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(record)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Skipping unparseable state file");
            None
        }
    }
}

fn evict_if_stale(path: &Path, now: i64, threshold_secs: i64) {
    // Re-read: a writer may have refreshed the record since we decided.
    let still_stale = load_record(path).is_some_and(|r| r.is_stale_at(now, threshold_secs));
    if !still_stale {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Evicted stale state record"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(error = %e, "Failed to evict stale state record"),
    }
}
