//! tmux-stat-hook: hook handler and status display for tmux-stat.
//!
//! ## Subcommands
//!
//! - `handle`: classify one hook event (JSON on stdin or as an argument) and
//!   update the record of the pane in `$TMUX_PANE`
//! - `status`: print the aggregated indicator for the status line

mod handle;
mod logging;
mod status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tmux_stat_core::config::resolve_state_dir;
use tmux_stat_core::STALE_THRESHOLD_SECS;

#[derive(Parser)]
#[command(name = "tmux-stat-hook")]
#[command(about = "Agent activity tracker for tmux status lines")]
#[command(version)]
struct Cli {
    /// State directory (defaults to $TMUX_STAT_STATE_DIR or ~/.claude/tmux-stat)
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a hook event (reads JSON from stdin unless given inline)
    Handle {
        /// Hook payload; stdin is read when omitted
        #[arg(value_name = "JSON")]
        input: Option<String>,
    },

    /// Print the aggregated indicator (empty when nothing is live)
    Status {
        /// Only consider panes in this tmux window (e.g. @3)
        #[arg(long, value_name = "WINDOW_ID")]
        window: Option<String>,

        #[arg(long, default_value = "!")]
        attention_icon: String,

        #[arg(long, default_value = "●")]
        running_icon: String,

        #[arg(long, default_value = "✓")]
        done_icon: String,

        /// Seconds after which a record is ignored
        #[arg(long, default_value_t = STALE_THRESHOLD_SECS)]
        stale_after: i64,
    },
}

fn main() {
    let cli = Cli::parse();

    let state_dir = match resolve_state_dir(cli.state_dir) {
        Ok(dir) => dir,
        Err(_) => {
            // No home and no override: nothing to track or display.
            std::process::exit(0);
        }
    };
    match cli.command {
        Commands::Handle { input } => {
            // Only the hook logs; the status line redraws too often to touch disk for it.
            let _logging_guard = logging::init(&state_dir);
            if let Err(e) = handle::run(&state_dir, input) {
                tracing::error!(error = %e, "tmux-stat-hook handle failed");
                std::process::exit(1);
            }
        }
        Commands::Status {
            window,
            attention_icon,
            running_icon,
            done_icon,
            stale_after,
        } => {
            let icons = tmux_stat_core::Icons {
                attention: attention_icon,
                running: running_icon,
                done: done_icon,
            };
            // The status line must never break: always exit 0.
            if let Some(line) = status::render(&state_dir, window.as_deref(), &icons, stale_after)
            {
                println!("{line}");
            }
        }
    }
}
