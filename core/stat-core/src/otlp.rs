//! OTLP/JSON envelope parsing.
//!
//! Two shapes arrive at the receiver and both normalise to [`TelemetryEvent`]:
//!
//! ```text
//! logs:   resourceLogs[].scopeLogs[].logRecords[]   event name in attribute "event.name"
//! traces: resourceSpans[].scopeSpans[].spans[]      event name in the span's "name"
//! ```
//!
//! Attributes are OTLP key/value lists whose values carry a type wrapper
//! (`{"stringValue": "..."}`, `{"intValue": "42"}`, ...). Parsing never fails;
//! anything unexpected is skipped.

use std::collections::BTreeMap;

use serde_json::Value;

/// Attribute holding the canonical event name on log records.
pub const EVENT_NAME_ATTR: &str = "event.name";

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Double(f64),
    Bool(bool),
}

impl AttrValue {
    fn from_otlp(value: &Value) -> Option<Self> {
        if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
            return Some(AttrValue::Str(s.to_string()));
        }
        if let Some(raw) = value.get("intValue") {
            // proto3 JSON encodes int64 as a decimal string.
            let parsed = raw
                .as_i64()
                .or_else(|| raw.as_str().and_then(|s| s.trim().parse().ok()));
            return parsed.map(AttrValue::Int);
        }
        if let Some(b) = value.get("boolValue").and_then(Value::as_bool) {
            return Some(AttrValue::Bool(b));
        }
        if let Some(d) = value.get("doubleValue").and_then(Value::as_f64) {
            return Some(AttrValue::Double(d));
        }
        None
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Str(s) => !matches!(s.as_str(), "" | "0" | "false" | "False" | "FALSE"),
            AttrValue::Int(i) => *i != 0,
            AttrValue::Double(d) => *d != 0.0,
            AttrValue::Bool(b) => *b,
        }
    }
}

/// One telemetry event in the shape the classifier consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryEvent {
    pub name: String,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl TelemetryEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: AttrValue) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    /// String attribute, or `""` when absent or not a string.
    pub fn str_attr(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(AttrValue::as_str)
            .unwrap_or("")
    }

    pub fn truthy_attr(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).map(AttrValue::is_truthy)
    }

    pub fn conversation_id(&self) -> &str {
        ["conversation_id", "conversation.id", "session_id"]
            .into_iter()
            .map(|key| self.str_attr(key))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

/// Parses a raw request body. Invalid JSON yields no events.
pub fn parse_envelope(body: &[u8]) -> Vec<TelemetryEvent> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => extract_events(&value),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed telemetry payload");
            Vec::new()
        }
    }
}

/// Walks both envelope shapes and returns every named event found.
pub fn extract_events(envelope: &Value) -> Vec<TelemetryEvent> {
    let logs = nested(envelope, &["resourceLogs", "scopeLogs", "logRecords"]);
    let spans = nested(envelope, &["resourceSpans", "scopeSpans", "spans"]);
    logs.chain(spans).filter_map(record_to_event).collect()
}

fn nested<'a>(root: &'a Value, path: &'a [&'a str]) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
    match path.split_first() {
        None => Box::new(std::iter::once(root)),
        Some((key, rest)) => Box::new(
            array(root, key)
                .iter()
                .flat_map(move |child| nested(child, rest)),
        ),
    }
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn record_to_event(record: &Value) -> Option<TelemetryEvent> {
    let attributes: BTreeMap<String, AttrValue> = array(record, "attributes")
        .iter()
        .filter_map(|attr| {
            let key = attr.get("key").and_then(Value::as_str)?;
            let value = AttrValue::from_otlp(attr.get("value")?)?;
            Some((key.to_string(), value))
        })
        .collect();

    let name = attributes
        .get(EVENT_NAME_ATTR)
        .and_then(AttrValue::as_str)
        .filter(|name| !name.is_empty())
        .or_else(|| record.get("name").and_then(Value::as_str))
        .unwrap_or("")
        .to_string();

    if name.is_empty() {
        return None;
    }
    Some(TelemetryEvent { name, attributes })
}
