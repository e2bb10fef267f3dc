//! # tmux-stat-core
//!
//! Shared logic for tracking agent activity in tmux panes.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The receiver wraps calls in
//!   its own blocking pool.
//! - **Graceful degradation**: Missing or corrupt state files read as "no
//!   record", never as errors on the display path.
//! - **One file per pane**: Writers for different panes never contend; every
//!   write is an atomic rename.
//!
//! ## Pipeline
//!
//! ```text
//! hook JSON ──► classify::hook ─────┐
//!                                   ├──► StateStore ──► aggregate ──► status line
//! OTLP JSON ──► otlp ──► classify::telemetry ┘
//! ```

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod otlp;
pub mod state;
pub mod tmux;
pub mod types;

pub use aggregate::{aggregate, Aggregate, Icons};
pub use classify::{classify_hook, classify_telemetry, HookEvent, HookInput, HookOutcome};
pub use error::{Result, StatError};
pub use otlp::{AttrValue, TelemetryEvent};
pub use state::{StateRecord, StateStore, STALE_THRESHOLD_SECS};
pub use tmux::{CommandTmux, Multiplexer, NoMultiplexer};
pub use types::{Status, Transition};
