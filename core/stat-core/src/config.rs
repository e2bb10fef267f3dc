//! Path and environment resolution shared by all binaries.

use crate::error::{Result, StatError};
use std::env;
use std::path::PathBuf;

/// Preferred override for the state directory.
pub const STATE_DIR_ENV: &str = "TMUX_STAT_STATE_DIR";
/// Older override still honoured by existing installs.
pub const LEGACY_STATE_DIR_ENV: &str = "STATE_DIR";
/// Set to `1`/`true`/`yes` to force debug-level logging.
pub const DEBUG_LOG_ENV: &str = "TMUX_STAT_DEBUG_LOG";

/// Returns the default state directory (`~/.claude/tmux-stat`).
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude").join("tmux-stat"))
}

/// Resolves the state directory: explicit flag, then environment, then default.
pub fn resolve_state_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    for var in [STATE_DIR_ENV, LEGACY_STATE_DIR_ENV] {
        if let Some(value) = env::var_os(var).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(value));
        }
    }
    default_state_dir().ok_or(StatError::HomeDirNotFound)
}

/// Whether debug logging was requested through [`DEBUG_LOG_ENV`].
pub fn debug_log_enabled() -> bool {
    env::var(DEBUG_LOG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}
