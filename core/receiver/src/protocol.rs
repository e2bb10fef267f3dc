//! Request and response bodies for the receiver's HTTP surface.
//!
//! Telemetry bodies are not modelled here; they go through
//! [`tmux_stat_core::otlp`] so malformed payloads never reach serde.

use serde::{Deserialize, Serialize};

pub const MAX_REQUEST_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub pane_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnregisterRequest {
    #[serde(default)]
    pub pane_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusReply {
    pub status: &'static str,
}

impl StatusReply {
    pub const OK: StatusReply = StatusReply { status: "ok" };
    pub const UNREGISTERED: StatusReply = StatusReply {
        status: "unregistered",
    };
}

#[derive(Debug, Serialize)]
pub struct RegisteredReply {
    pub status: &'static str,
    pub mapping_key: String,
}

#[derive(Debug, Serialize)]
pub struct HealthReply {
    pub status: &'static str,
    pub mappings: usize,
    pub idle_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Parses a JSON request body, rejecting anything that is not an object.
pub fn parse_body<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T, ErrorReply> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ErrorReply::new("pane_id required"));
    }
    serde_json::from_slice(body).map_err(|_| ErrorReply::new("invalid JSON"))
}

/// Returns the trimmed pane id, or the 400 body to send back.
pub fn require_pane_id(pane_id: Option<String>) -> Result<String, ErrorReply> {
    pane_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ErrorReply::new("pane_id required"))
}
