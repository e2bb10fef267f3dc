//! Serialized state record written once per tracked pane.
//!
//! On disk each record is a small JSON object; the file stem is the session
//! key, so the key itself is not repeated inside the document:
//!
//! ```json
//! {"status":"running","timestamp":1767225600,"session_id":"abc","tmux_window":"@3","message":"Ran: shell"}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatError};
use crate::types::Status;

/// Records older than this are treated as absent by every read path.
pub const STALE_THRESHOLD_SECS: i64 = 300; // 5 minutes

/// Extension used for record files inside the state directory.
pub const RECORD_EXTENSION: &str = "state";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(skip)]
    pub session_key: String,
    pub status: Status,
    /// Epoch seconds of the last write.
    pub timestamp: i64,
    /// Agent conversation/thread id, for correlation only.
    #[serde(rename = "session_id", default)]
    pub conversation_id: String,
    /// Display partition (tmux window id) the pane belongs to.
    #[serde(rename = "tmux_window", alias = "partition_key", default)]
    pub partition_key: String,
    #[serde(default)]
    pub message: String,
}

impl StateRecord {
    pub fn age_secs(&self, now: i64) -> i64 {
        now - self.timestamp
    }

    /// Returns true if the record is older than `threshold_secs` at `now`.
    /// A record exactly at the threshold is still fresh.
    pub fn is_stale_at(&self, now: i64, threshold_secs: i64) -> bool {
        self.age_secs(now) > threshold_secs
    }
}

/// Derives the storage key from a raw tmux pane id (`%12` → `12`).
///
/// Anything that could escape the state directory or collide with temp files
/// is rejected.
pub fn session_key(pane_id: &str) -> Result<String> {
    let key = pane_id.trim().trim_start_matches('%');
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && !key.contains(['/', '\\', '\0']);
    if valid {
        Ok(key.to_string())
    } else {
        Err(StatError::InvalidSessionKey(pane_id.to_string()))
    }
}
