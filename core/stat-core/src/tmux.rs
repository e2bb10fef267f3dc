//! Terminal multiplexer seam.
//!
//! The store only needs two things from tmux: which window a pane lives in
//! (the display partition) and a nudge to redraw the status line after a
//! write. Both are best-effort; tmux being absent is not an error.

use std::env;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const TMUX_TIMEOUT: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub trait Multiplexer: Send + Sync {
    /// Window id (`@3`) containing `pane_id`, or `""` if unknown.
    fn window_for_pane(&self, pane_id: &str) -> String;

    /// Asks attached clients to redraw their status line.
    fn refresh_status(&self);
}

/// Talks to the `tmux` binary on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct CommandTmux;

impl Multiplexer for CommandTmux {
    fn window_for_pane(&self, pane_id: &str) -> String {
        run_tmux(["display-message", "-t", pane_id, "-p", "#{window_id}"])
            .map(|out| out.trim().to_string())
            .unwrap_or_default()
    }

    fn refresh_status(&self) {
        if env::var_os("TMUX").is_none() {
            return;
        }
        let _ = run_tmux(["refresh-client", "-S"]);
    }
}

/// Does nothing; used when tmux integration is disabled and in tests.
#[derive(Debug, Clone, Default)]
pub struct NoMultiplexer;

impl Multiplexer for NoMultiplexer {
    fn window_for_pane(&self, _pane_id: &str) -> String {
        String::new()
    }

    fn refresh_status(&self) {}
}

/// Runs tmux with a hard timeout so a wedged server never blocks a caller.
fn run_tmux<const N: usize>(args: [&str; N]) -> Option<String> {
    let mut child = Command::new("tmux")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + TMUX_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => break,
            Ok(Some(_)) => return None,
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            Ok(None) | Err(_) => {
                tracing::debug!("tmux did not respond in time");
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
    }

    let output = child.wait_with_output().ok()?;
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_multiplexer_reports_no_window() {
        assert_eq!(NoMultiplexer.window_for_pane("%1"), "");
        NoMultiplexer.refresh_status();
    }
}
