//! Flat JSON record for one finished span.
//!
//! Each exported span becomes one self-contained JSON object on its own line,
//! so trace files can be inspected with `jq` or grepped by trace ID.

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::time::SystemTime;

#[derive(Debug, Serialize)]
pub struct SpanRecord {
    pub service: String,
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub name: String,
    pub kind: &'static str,
    pub start: String,
    pub end: String,
    pub duration_us: u128,
    pub attributes: Map<String, JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventRecord>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventRecord {
    pub name: String,
    pub at: String,
    pub attributes: Map<String, JsonValue>,
}

impl SpanRecord {
    pub fn from_span(service: &str, span: &SpanData) -> Self {
        let (status, status_message) = match &span.status {
            Status::Unset => ("unset", None),
            Status::Ok => ("ok", None),
            Status::Error { description } => ("error", Some(description.to_string())),
        };

        let parent_span_id =
            (span.parent_span_id != SpanId::INVALID).then(|| format!("{:016x}", span.parent_span_id));

        let duration_us = span
            .end_time
            .duration_since(span.start_time)
            .map_or(0, |elapsed| elapsed.as_micros());

        Self {
            service: service.to_string(),
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id,
            name: span.name.to_string(),
            kind: kind_name(&span.span_kind),
            start: timestamp(span.start_time),
            end: timestamp(span.end_time),
            duration_us,
            attributes: attribute_map(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| EventRecord {
                    name: event.name.to_string(),
                    at: timestamp(event.timestamp),
                    attributes: attribute_map(&event.attributes),
                })
                .collect(),
            status,
            status_message,
        }
    }
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

fn timestamp(at: SystemTime) -> String {
    DateTime::<Utc>::from(at).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn attribute_map(attributes: &[KeyValue]) -> Map<String, JsonValue> {
    attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => JsonValue::from(*f),
        Value::String(s) => JsonValue::String(s.to_string()),
        Value::Array(_) => JsonValue::String(value.to_string()),
    }
}
