//! Per-pane state records.
//!
//! - [`types`]: the on-disk record and key derivation
//! - [`store`]: atomic writes, reads, and staleness-filtered enumeration

mod store;
pub(crate) mod types;

pub use store::StateStore;
pub use types::{session_key, StateRecord, RECORD_EXTENSION, STALE_THRESHOLD_SECS};
