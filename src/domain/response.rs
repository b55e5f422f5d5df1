//! Search service response model and shape normalization.
//!
//! The service answers either with the result envelope directly or with a
//! one-element array wrapping it. [`Payload`] names both shapes explicitly and is
//! resolved exactly once, at the network boundary; nothing downstream inspects
//! the wire shape again.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "channels": [{
//!     "totalResults": "1,234",
//!     "startIndex": "0",
//!     "itemsPerPage": "10",
//!     "items": [
//!       { "title": "...", "link": "...", "description": "...",
//!         "pubDate": "Mon, 05 Feb 2024 10:00:00 +0000", "sizename": "12 kbyte" }
//!     ]
//!   }]
//! }
//! ```

use crate::domain::error::{PortalSearchError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// One search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, rename = "pubDate", deserialize_with = "lenient_string")]
    pub pub_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sizename: String,
}

/// A single result channel as sent on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    #[serde(rename = "totalResults", default, deserialize_with = "lenient_string")]
    pub total_results: String,
    #[serde(rename = "startIndex", default, deserialize_with = "lenient_u64")]
    pub start_index: u64,
    #[serde(rename = "itemsPerPage", default, deserialize_with = "lenient_u64")]
    pub items_per_page: u64,
    /// Raw items; decoded one by one so a single bad entry cannot fail the page.
    #[serde(default)]
    pub items: Vec<JsonValue>,
}

/// The result envelope: `{ "channels": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub channels: Vec<Channel>,
}

/// The two accepted payload shapes.
#[derive(Debug, Clone)]
pub enum Payload {
    /// `{ "channels": [...] }`
    Direct(Envelope),
    /// `[{ "channels": [...] }]`
    Wrapped(Envelope),
}

/// Normalized search response handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total hit count as sent, possibly with thousands separators.
    pub total_results: String,
    pub start_index: u64,
    pub items_per_page: u64,
    /// Decodable items in wire order; null and undecodable entries are dropped.
    pub items: Vec<SearchItem>,
}

impl Payload {
    /// Decodes a response body, removing a JSONP wrapper first when `callback`
    /// names one.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::MalformedResponse`] when the body is not JSON,
    /// is an array whose length is not exactly one, or does not contain a
    /// `channels` envelope.
    pub fn parse(body: &str, callback: Option<&str>) -> Result<Self> {
        let body = callback.map_or(body, |name| strip_jsonp(body, name));

        let value: JsonValue = serde_json::from_str(body)
            .map_err(|e| PortalSearchError::MalformedResponse(format!("invalid JSON: {e}")))?;

        match value {
            JsonValue::Array(mut elements) if elements.len() == 1 => {
                Ok(Self::Wrapped(decode_envelope(elements.remove(0))?))
            }
            JsonValue::Array(elements) => Err(PortalSearchError::MalformedResponse(format!(
                "expected a one-element array, got {} elements",
                elements.len()
            ))),
            value @ JsonValue::Object(_) => Ok(Self::Direct(decode_envelope(value)?)),
            other => Err(PortalSearchError::MalformedResponse(format!(
                "expected an object or array, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Resolves either shape into the canonical response.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::MalformedResponse`] when the envelope has no
    /// channel.
    pub fn into_response(self) -> Result<SearchResponse> {
        let envelope = match self {
            Self::Direct(envelope) | Self::Wrapped(envelope) => envelope,
        };

        let channel = envelope
            .channels
            .into_iter()
            .next()
            .ok_or_else(|| PortalSearchError::MalformedResponse("no result channel".to_string()))?;

        let received = channel.items.len();
        let items: Vec<SearchItem> = channel
            .items
            .into_iter()
            .filter(|value| !value.is_null())
            .filter_map(|value| match serde_json::from_value::<SearchItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping undecodable result item");
                    None
                }
            })
            .collect();

        if items.len() != received {
            tracing::debug!(received, kept = items.len(), "dropped empty or invalid items");
        }

        Ok(SearchResponse {
            total_results: channel.total_results,
            start_index: channel.start_index,
            items_per_page: channel.items_per_page,
            items,
        })
    }
}

impl SearchResponse {
    /// Parses and normalizes a response body in one step.
    ///
    /// # Errors
    ///
    /// See [`Payload::parse`] and [`Payload::into_response`].
    pub fn from_body(body: &str, callback: Option<&str>) -> Result<Self> {
        Payload::parse(body, callback)?.into_response()
    }

    /// Total hit count with thousands separators removed.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::MalformedResponse`] if the stripped text is not
    /// an unsigned integer.
    pub fn total_count(&self) -> Result<u64> {
        parse_total(&self.total_results)
    }
}

/// Strips `,` and `.` grouping separators and parses the remaining digits.
///
/// # Errors
///
/// Returns [`PortalSearchError::MalformedResponse`] for empty or non-numeric input.
///
/// # Examples
///
/// ```
/// use portalsearch::domain::response::parse_total;
///
/// assert_eq!(parse_total("1,234").unwrap(), 1234);
/// assert_eq!(parse_total("1.234.567").unwrap(), 1_234_567);
/// ```
pub fn parse_total(raw: &str) -> Result<u64> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();

    digits
        .parse::<u64>()
        .map_err(|_| PortalSearchError::MalformedResponse(format!("invalid totalResults: {raw:?}")))
}

/// Removes a `callback( ... )` or `callback( ... );` wrapper.
///
/// Bodies that do not start with the callback name are returned unchanged.
#[must_use]
pub fn strip_jsonp<'a>(body: &'a str, callback: &str) -> &'a str {
    let trimmed = body.trim();
    let Some(rest) = trimmed.strip_prefix(callback) else {
        return body;
    };
    let Some(inner) = rest.trim_start().strip_prefix('(') else {
        return body;
    };
    let inner = inner.trim_end();
    let inner = inner.strip_suffix(';').unwrap_or(inner).trim_end();
    inner.strip_suffix(')').unwrap_or(inner)
}

fn decode_envelope(value: JsonValue) -> Result<Envelope> {
    serde_json::from_value(value)
        .map_err(|e| PortalSearchError::MalformedResponse(format!("unexpected envelope: {e}")))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Accepts strings, numbers, booleans and null (as `""`).
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a string, got {}",
                json_kind(&other)
            )))
        }
    })
}

/// Accepts unsigned numbers and numeric strings; null and empty strings are zero.
fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(0),
        JsonValue::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("expected an unsigned integer, got {n}"))),
        JsonValue::String(s) if s.trim().is_empty() => Ok(0),
        JsonValue::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}"))),
        other => Err(serde::de::Error::custom(format!(
            "expected a number, got {}",
            json_kind(&other)
        ))),
    }
}
