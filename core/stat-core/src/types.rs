//! Core types shared by the hook handler, the telemetry receiver and the
//! display subcommands.

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Status
// ═══════════════════════════════════════════════════════════════════════════════

/// Activity indicator for a single agent pane.
///
/// Serialized in lowercase (`"running"`, `"attention"`, `"done"`), which is the
/// format display scripts read from the state files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Attention,
    Done,
}

impl Status {
    /// All statuses, highest display priority first.
    pub const BY_PRIORITY: [Status; 3] = [Status::Attention, Status::Running, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Running => "running",
            Status::Attention => "attention",
            Status::Done => "done",
        }
    }

    /// Lower is more urgent.
    pub fn priority(&self) -> u8 {
        match self {
            Status::Attention => 0,
            Status::Running => 1,
            Status::Done => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Transitions
// ═══════════════════════════════════════════════════════════════════════════════

/// A classified status change with its display annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: Status,
    pub message: String,
}

impl Transition {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}
