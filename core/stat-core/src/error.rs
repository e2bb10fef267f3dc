//! Error types for tmux-stat-core operations.

use std::path::PathBuf;

/// All errors that can occur in tmux-stat-core operations.
///
/// Read paths that feed the display never surface these; they log and degrade
/// to "no record". Writers propagate them to the binary entrypoints.
#[derive(Debug, thiserror::Error)]
pub enum StatError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Invalid session key: {0:?}")]
    InvalidSessionKey(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist state file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StatError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        StatError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using StatError.
pub type Result<T> = std::result::Result<T, StatError>;
