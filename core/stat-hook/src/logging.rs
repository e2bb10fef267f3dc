//! File logging for the hook binary.
//!
//! Hook stdout/stderr are captured by the agent, so logs go to a daily
//! rolling file under `<state_dir>/logs/` instead.

use std::path::Path;

use tmux_stat_core::config::debug_log_enabled;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "hook.log";

/// Installs the global subscriber. The guard must outlive all logging.
pub fn init(state_dir: &Path) -> Option<WorkerGuard> {
    let log_dir = state_dir.join(LOG_DIR);
    if fs_err::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let filter = if debug_log_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
