//! Short display annotations attached to state records.

/// Longest message kept verbatim, in characters.
pub const MAX_MESSAGE_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";

/// Collapses whitespace and truncates to [`MAX_MESSAGE_CHARS`] plus an ellipsis.
pub fn truncate_message(message: &str) -> String {
    let collapsed = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_MESSAGE_CHARS {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(MAX_MESSAGE_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// `"<prefix> <tool>"` when a tool name is known, otherwise `fallback`.
pub fn tool_message(prefix: &str, tool: &str, fallback: &str) -> String {
    if tool.is_empty() {
        fallback.to_string()
    } else {
        truncate_message(&format!("{prefix} {tool}"))
    }
}

/// The supplied free text, truncated, or `fallback` when empty.
pub fn message_or(message: &str, fallback: &str) -> String {
    let truncated = truncate_message(message);
    if truncated.is_empty() {
        fallback.to_string()
    } else {
        truncated
    }
}
