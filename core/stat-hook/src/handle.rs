//! Event handler for agent lifecycle hooks.
//!
//! Reads one JSON document, classifies it, and updates the record of the pane
//! named by `$TMUX_PANE`. Outside tmux there is no pane to track, so the
//! handler drains its input and exits quietly.

use std::env;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;
use tmux_stat_core::{
    classify_hook, CommandTmux, HookInput, HookOutcome, Multiplexer, StatError, StateStore,
};

/// Pane identifier exported by tmux into every pane's environment.
const PANE_ENV: &str = "TMUX_PANE";

#[derive(Error, Debug)]
pub enum HandleError {
    #[error("Failed to read hook input: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    State(#[from] StatError),
}

pub fn run(state_dir: &Path, inline_input: Option<String>) -> Result<(), HandleError> {
    let input = match inline_input {
        Some(input) => input,
        None => {
            // Invalid UTF-8 is not a read failure: it classifies as an unknown event.
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            String::from_utf8_lossy(&buffer).into_owned()
        }
    };

    let pane_id = match env::var(PANE_ENV) {
        Ok(pane) if !pane.trim().is_empty() => pane,
        _ => {
            tracing::debug!("Skipping hook event (not inside a tmux pane)");
            return Ok(());
        }
    };

    let store = StateStore::new(state_dir);
    handle_input(&input, &pane_id, &store, &CommandTmux)
}

pub(crate) fn handle_input(
    input: &str,
    pane_id: &str,
    store: &StateStore,
    mux: &dyn Multiplexer,
) -> Result<(), HandleError> {
    if input.trim().is_empty() {
        return Ok(());
    }

    let hook_input = HookInput::parse(input);
    let Some(event) = hook_input.to_event() else {
        tracing::debug!(pane = %pane_id, "Skipping hook input without an event name");
        return Ok(());
    };

    match classify_hook(&event) {
        HookOutcome::Update(transition) => {
            let window = mux.window_for_pane(pane_id);
            store.write(
                pane_id,
                transition.status,
                &hook_input.session_id,
                &window,
                &transition.message,
            )?;
            tracing::debug!(
                event = %hook_input.hook_event_name,
                pane = %pane_id,
                status = %transition.status,
                "State updated"
            );
        }
        HookOutcome::Remove => {
            store.remove(pane_id)?;
            tracing::debug!(pane = %pane_id, "Session ended; record removed");
        }
        HookOutcome::Ignore => {
            tracing::debug!(event = %hook_input.hook_event_name, "Unhandled event");
            return Ok(());
        }
    }

    mux.refresh_status();
    Ok(())
}
