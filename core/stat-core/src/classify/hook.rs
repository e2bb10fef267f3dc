//! Lifecycle hook events → status.
//!
//! ```text
//! SessionStart                                     → running
//! UserPromptSubmit                                 → running
//! PreToolUse / PostToolUse                         → running
//! PermissionRequest                                → attention
//! Notification permission_prompt|elicitation_dialog → attention
//! Notification idle_prompt                         → done
//! Stop                                             → done
//! SessionEnd                                       → remove record
//! anything else                                    → ignored
//! ```

use serde_json::Value;

use super::message::{message_or, tool_message};
use crate::types::{Status, Transition};

/// Hook payload fields we care about.
///
/// Parsed leniently: absent fields, wrong types, and non-object documents all
/// come through as empty strings instead of errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookInput {
    pub hook_event_name: String,
    pub session_id: String,
    pub notification_type: String,
    pub tool_name: String,
    pub message: String,
}

impl HookInput {
    pub fn parse(input: &str) -> Self {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::debug!(error = %e, "Hook input is not valid JSON");
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let event = match str_field(value, "hook_event_name") {
            name if name.is_empty() => str_field(value, "event"),
            name => name,
        };
        HookInput {
            hook_event_name: event,
            session_id: str_field(value, "session_id"),
            notification_type: str_field(value, "notification_type"),
            tool_name: str_field(value, "tool_name"),
            message: str_field(value, "message"),
        }
    }

    /// Returns `None` when no event name was supplied.
    pub fn to_event(&self) -> Option<HookEvent> {
        let event = match self.hook_event_name.as_str() {
            "" => return None,
            "SessionStart" => HookEvent::SessionStart,
            "UserPromptSubmit" => HookEvent::UserPromptSubmit,
            "PreToolUse" => HookEvent::PreToolUse {
                tool_name: self.tool_name.clone(),
            },
            "PostToolUse" => HookEvent::PostToolUse {
                tool_name: self.tool_name.clone(),
            },
            "PermissionRequest" => HookEvent::PermissionRequest {
                tool_name: self.tool_name.clone(),
            },
            "Notification" => HookEvent::Notification {
                notification_type: self.notification_type.clone(),
                message: self.message.clone(),
            },
            "Stop" => HookEvent::Stop,
            "SessionEnd" => HookEvent::SessionEnd,
            other => HookEvent::Unknown {
                event_name: other.to_string(),
            },
        };
        Some(event)
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    SessionStart,
    UserPromptSubmit,
    PreToolUse {
        tool_name: String,
    },
    PostToolUse {
        tool_name: String,
    },
    PermissionRequest {
        tool_name: String,
    },
    Notification {
        notification_type: String,
        message: String,
    },
    Stop,
    SessionEnd,
    Unknown {
        event_name: String,
    },
}

/// What a hook event does to the pane's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Update(Transition),
    Remove,
    Ignore,
}

pub fn classify_hook(event: &HookEvent) -> HookOutcome {
    let (status, message) = match event {
        HookEvent::SessionStart => (Status::Running, "Session started".to_string()),
        HookEvent::UserPromptSubmit => (Status::Running, "Working...".to_string()),
        HookEvent::PreToolUse { tool_name } => (
            Status::Running,
            tool_message("Using tool:", tool_name, "Using tool"),
        ),
        HookEvent::PostToolUse { tool_name } => (
            Status::Running,
            tool_message("Ran:", tool_name, "Tool completed"),
        ),
        HookEvent::PermissionRequest { tool_name } => (
            Status::Attention,
            tool_message("Approve?", tool_name, "Permission needed"),
        ),
        HookEvent::Notification {
            notification_type,
            message,
        } => match notification_type.as_str() {
            "permission_prompt" | "elicitation_dialog" => {
                (Status::Attention, message_or(message, "Needs attention"))
            }
            // Idle prompts mean the agent finished its turn.
            "idle_prompt" => (Status::Done, message_or(message, "Waiting for input")),
            _ => return HookOutcome::Ignore,
        },
        HookEvent::Stop => (Status::Done, "Finished".to_string()),
        HookEvent::SessionEnd => return HookOutcome::Remove,
        HookEvent::Unknown { .. } => return HookOutcome::Ignore,
    };
    HookOutcome::Update(Transition::new(status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_json(input: &str) -> HookOutcome {
        match HookInput::parse(input).to_event() {
            Some(event) => classify_hook(&event),
            None => HookOutcome::Ignore,
        }
    }

    fn status_of(input: &str) -> Option<Status> {
        match classify_json(input) {
            HookOutcome::Update(t) => Some(t.status),
            _ => None,
        }
    }

    #[test]
    fn test_session_start_yields_running() {
        assert_eq!(
            status_of(r#"{"hook_event_name":"SessionStart"}"#),
            Some(Status::Running)
        );
    }

    #[test]
    fn test_event_alias_is_accepted() {
        assert_eq!(status_of(r#"{"event":"SessionStart"}"#), Some(Status::Running));
    }

    #[test]
    fn test_tool_events_yield_running_with_tool_message() {
        let pre = classify_json(r#"{"hook_event_name":"PreToolUse","tool_name":"Bash"}"#);
        assert_eq!(
            pre,
            HookOutcome::Update(Transition::new(Status::Running, "Using tool: Bash"))
        );
        let post = classify_json(r#"{"hook_event_name":"PostToolUse","tool_name":"Edit"}"#);
        assert_eq!(
            post,
            HookOutcome::Update(Transition::new(Status::Running, "Ran: Edit"))
        );
    }

    #[test]
    fn test_permission_request_yields_attention() {
        assert_eq!(
            status_of(r#"{"hook_event_name":"PermissionRequest"}"#),
            Some(Status::Attention)
        );
    }

    #[test]
    fn test_notification_subtypes() {
        assert_eq!(
            status_of(r#"{"hook_event_name":"Notification","notification_type":"permission_prompt"}"#),
            Some(Status::Attention)
        );
        assert_eq!(
            status_of(r#"{"hook_event_name":"Notification","notification_type":"elicitation_dialog"}"#),
            Some(Status::Attention)
        );
        assert_eq!(
            status_of(r#"{"hook_event_name":"Notification","notification_type":"idle_prompt"}"#),
            Some(Status::Done)
        );
        assert_eq!(
            status_of(r#"{"hook_event_name":"Notification","notification_type":"auth_success"}"#),
            None
        );
    }

    #[test]
    fn test_notification_message_is_truncated() {
        let long = "Claude needs your permission to use a very long tool name indeed";
        let input = format!(
            r#"{{"hook_event_name":"Notification","notification_type":"permission_prompt","message":"{long}"}}"#
        );
        match classify_json(&input) {
            HookOutcome::Update(t) => {
                assert!(t.message.ends_with("..."));
                assert_eq!(t.message.chars().count(), 53);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_stop_yields_done() {
        assert_eq!(status_of(r#"{"hook_event_name":"Stop"}"#), Some(Status::Done));
    }

    #[test]
    fn test_session_end_removes() {
        assert_eq!(
            classify_json(r#"{"hook_event_name":"SessionEnd"}"#),
            HookOutcome::Remove
        );
    }

    #[test]
    fn test_unknown_and_malformed_are_ignored() {
        assert_eq!(classify_json(r#"{"hook_event_name":"SubagentStop"}"#), HookOutcome::Ignore);
        assert_eq!(classify_json("not json"), HookOutcome::Ignore);
        assert_eq!(classify_json("[1,2]"), HookOutcome::Ignore);
        assert_eq!(classify_json(r#"{"hook_event_name":42}"#), HookOutcome::Ignore);
    }

    #[test]
    fn test_wrong_typed_fields_read_as_empty() {
        let input = HookInput::parse(r#"{"hook_event_name":"PreToolUse","tool_name":{"x":1}}"#);
        assert_eq!(input.tool_name, "");
        assert_eq!(
            classify_hook(&input.to_event().unwrap()),
            HookOutcome::Update(Transition::new(Status::Running, "Using tool"))
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let input = r#"{"hook_event_name":"PostToolUse","tool_name":"Read"}"#;
        assert_eq!(classify_json(input), classify_json(input));
    }
}
