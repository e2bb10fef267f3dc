//! Event → status classification.
//!
//! Both producers funnel into the same [`Status`](crate::types::Status) enum
//! through separate tables:
//!
//! - [`hook`]: lifecycle hook events delivered as one JSON document per call
//! - [`telemetry`]: OTLP events already normalised by [`crate::otlp`]
//!
//! Classification is pure. Unknown or malformed input classifies to nothing
//! rather than failing.

pub mod hook;
pub mod message;
pub mod telemetry;

pub use hook::{classify_hook, HookEvent, HookInput, HookOutcome};
pub use message::truncate_message;
pub use telemetry::classify_telemetry;
