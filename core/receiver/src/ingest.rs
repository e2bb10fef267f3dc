//! Telemetry → state fan-out.
//!
//! Runs on the blocking pool: store writes and tmux window lookups are
//! synchronous file and process I/O.

use std::collections::HashMap;

use tmux_stat_core::{classify_telemetry, Multiplexer, StateStore, TelemetryEvent};
use tracing::{debug, warn};

use crate::registry::RegistrationTable;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub events: usize,
    pub classified: usize,
    pub writes: usize,
}

/// Classifies each event and writes the outcome to every registered pane.
pub fn ingest(
    events: &[TelemetryEvent],
    registry: &RegistrationTable,
    store: &StateStore,
    mux: &dyn Multiplexer,
    now_secs: i64,
) -> IngestSummary {
    let mut summary = IngestSummary {
        events: events.len(),
        ..IngestSummary::default()
    };
    let mut windows: HashMap<String, String> = HashMap::new();

    for event in events {
        let Some(transition) = classify_telemetry(event) else {
            debug!(event = %event.name, "Ignoring unclassified telemetry event");
            continue;
        };
        summary.classified += 1;

        let panes = registry.snapshot();
        if panes.is_empty() {
            debug!(event = %event.name, "No registered panes for telemetry event");
            continue;
        }

        for pane in panes {
            let window = windows
                .entry(pane.clone())
                .or_insert_with(|| mux.window_for_pane(&pane));
            match store.write(
                &pane,
                transition.status,
                event.conversation_id(),
                window,
                &transition.message,
            ) {
                Ok(_) => {
                    summary.writes += 1;
                    registry.touch(&pane, now_secs);
                }
                Err(err) => warn!(error = %err, pane = %pane, "Failed to write telemetry state"),
            }
        }
    }

    if summary.writes > 0 {
        mux.refresh_status();
    }
    summary
}
