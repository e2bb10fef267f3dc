//! Codex telemetry events → status.
//!
//! Event names may arrive namespaced (`codex.tool_result`) or bare; both map
//! through the same table.

use super::message::tool_message;
use crate::otlp::TelemetryEvent;
use crate::types::{Status, Transition};

/// Namespace prefix Codex puts on its event names.
pub const EVENT_PREFIX: &str = "codex.";

/// Strips the `codex.` namespace if present.
pub fn canonical_event_name(name: &str) -> &str {
    name.strip_prefix(EVENT_PREFIX).unwrap_or(name)
}

pub fn classify_telemetry(event: &TelemetryEvent) -> Option<Transition> {
    let tool = match event.str_attr("tool_name") {
        "" => event.str_attr("tool"),
        name => name,
    };
    let status = event.str_attr("status");

    let (next, message) = match canonical_event_name(&event.name) {
        "conversation_starts" => {
            let model = event.str_attr("model");
            let message = if model.is_empty() {
                "Codex started".to_string()
            } else {
                tool_message("Codex:", model, "Codex started")
            };
            (Status::Running, message)
        }
        "tool_decision" => {
            if status == "pending" || event.truthy_attr("needs_approval") == Some(true) {
                (
                    Status::Attention,
                    tool_message("Approve?", tool, "Approval needed"),
                )
            } else if status == "approved" {
                (Status::Running, tool_message("Approved:", tool, "Tool approved"))
            } else if status == "denied" {
                (Status::Done, tool_message("Denied:", tool, "Tool denied"))
            } else {
                return None;
            }
        }
        "tool_result" => {
            let succeeded = event.truthy_attr("success").unwrap_or(true);
            let errored = event.truthy_attr("error").unwrap_or(false);
            if !succeeded || status == "failed" || errored {
                (Status::Attention, tool_message("Failed:", tool, "Tool failed"))
            } else {
                (Status::Running, tool_message("Ran:", tool, "Tool completed"))
            }
        }
        "conversation_ends" => (Status::Done, "Codex finished".to_string()),
        "response" => (Status::Running, "Generating...".to_string()),
        "user_input_required" => (Status::Attention, "Input needed".to_string()),
        _ => return None,
    };

    Some(Transition::new(next, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otlp::AttrValue;

    fn event(name: &str) -> TelemetryEvent {
        TelemetryEvent::new(name)
    }

    fn s(value: &str) -> AttrValue {
        AttrValue::Str(value.to_string())
    }

    fn status_of(event: &TelemetryEvent) -> Option<Status> {
        classify_telemetry(event).map(|t| t.status)
    }

    #[test]
    fn conversation_lifecycle() {
        let start = classify_telemetry(&event("codex.conversation_starts").with_attr("model", s("gpt-5")))
            .unwrap();
        assert_eq!(start, Transition::new(Status::Running, "Codex: gpt-5"));
        assert_eq!(
            classify_telemetry(&event("codex.conversation_starts")).unwrap().message,
            "Codex started"
        );
        assert_eq!(status_of(&event("codex.conversation_ends")), Some(Status::Done));
    }

    #[test]
    fn bare_names_are_accepted() {
        assert_eq!(status_of(&event("conversation_starts")), Some(Status::Running));
        assert_eq!(status_of(&event("conversation_ends")), Some(Status::Done));
    }

    #[test]
    fn tool_decision_statuses() {
        let pending = event("codex.tool_decision")
            .with_attr("status", s("pending"))
            .with_attr("tool_name", s("shell"));
        assert_eq!(
            classify_telemetry(&pending).unwrap(),
            Transition::new(Status::Attention, "Approve? shell")
        );

        let approved = event("codex.tool_decision")
            .with_attr("status", s("approved"))
            .with_attr("tool", s("apply_patch"));
        assert_eq!(
            classify_telemetry(&approved).unwrap(),
            Transition::new(Status::Running, "Approved: apply_patch")
        );

        let denied = event("codex.tool_decision").with_attr("status", s("denied"));
        assert_eq!(status_of(&denied), Some(Status::Done));

        let flagged = event("codex.tool_decision").with_attr("needs_approval", AttrValue::Bool(true));
        assert_eq!(status_of(&flagged), Some(Status::Attention));

        assert_eq!(status_of(&event("codex.tool_decision")), None);
    }

    #[test]
    fn tool_result_outcomes() {
        let ok = event("codex.tool_result").with_attr("success", AttrValue::Bool(true));
        assert_eq!(status_of(&ok), Some(Status::Running));

        let default_success = event("codex.tool_result").with_attr("tool_name", s("shell"));
        assert_eq!(
            classify_telemetry(&default_success).unwrap(),
            Transition::new(Status::Running, "Ran: shell")
        );

        let explicit_success = event("codex.tool_result").with_attr("status", s("success"));
        assert_eq!(status_of(&explicit_success), Some(Status::Running));

        let failed_flag = event("codex.tool_result").with_attr("success", AttrValue::Bool(false));
        assert_eq!(status_of(&failed_flag), Some(Status::Attention));

        let failed_status = event("codex.tool_result").with_attr("status", s("failed"));
        assert_eq!(
            classify_telemetry(&failed_status).unwrap(),
            Transition::new(Status::Attention, "Tool failed")
        );

        let errored = event("codex.tool_result").with_attr("error", s("exit code 1"));
        assert_eq!(status_of(&errored), Some(Status::Attention));
    }

    #[test]
    fn extra_events() {
        assert_eq!(status_of(&event("codex.response")), Some(Status::Running));
        assert_eq!(status_of(&event("codex.user_input_required")), Some(Status::Attention));
    }

    #[test]
    fn unknown_events_are_ignored() {
        assert_eq!(status_of(&event("codex.api_request")), None);
        assert_eq!(status_of(&event("")), None);
        assert_eq!(status_of(&event("tool_result_extra")), None);
    }
}
