//! Response normalization.
//!
//! # Data Flow
//! ```text
//! Backend reply data (Payload, every value usually a string)
//!     → per-route model (fixed shape, list shape, or pass-through)
//!     → RouteResponse::to_wire
//!     → JSON object sent to the client
//! ```
//!
//! # Design Decisions
//! - Fixed-shape models coerce every field to a string; absent fields become
//!   `""` (or `"0"` for counts) so the wire shape never loses keys
//! - Nested data the backend returns as JSON text is decoded here, never in
//!   the command proxy
//! - Decoding works on a copy; the raw reply is never mutated

pub mod chats;
pub mod messages;
pub mod polls;
pub mod system;
pub mod users;

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::params::Payload;

/// A typed wire response.
pub trait RouteResponse: fmt::Debug + Send + Sync {
    /// Canonical wire form. Always a JSON object.
    fn to_wire(&self) -> Value;
}

impl<T> RouteResponse for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn to_wire(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Payload::new()))
    }
}

pub type BoxedResponse = Box<dyn RouteResponse>;

/// Reply data returned as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PassThroughResponse(Payload);

impl PassThroughResponse {
    pub fn new(payload: Payload) -> Self {
        Self(payload)
    }
}

/// Reply data returned as-is, except that the named fields are decoded from
/// JSON text when they hold an encoded array or object.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResponse {
    raw: Payload,
    json_fields: &'static [&'static str],
}

impl DecodedResponse {
    pub fn new(raw: Payload, json_fields: &'static [&'static str]) -> Self {
        Self { raw, json_fields }
    }

    /// A decoded copy of the reply.
    pub fn decoded(&self) -> Payload {
        let mut out = self.raw.clone();
        for field in self.json_fields {
            if let Some(decoded) = out.get(*field).and_then(decode_json_text) {
                out.insert((*field).to_string(), decoded);
            }
        }
        out
    }
}

impl Serialize for DecodedResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.decoded().serialize(serializer)
    }
}

/// Structured value of JSON text that encodes an array or object.
pub fn decode_json_text(value: &Value) -> Option<Value> {
    let text = value.as_str()?;
    match serde_json::from_str::<Value>(text) {
        Ok(decoded @ (Value::Array(_) | Value::Object(_))) => Some(decoded),
        _ => None,
    }
}

/// String form of a reply field; `""` when absent or null.
pub fn text(payload: &Payload, key: &str) -> String {
    optional_text(payload, key).unwrap_or_default()
}

/// String form of a reply field, or `default` when absent or null.
pub fn text_or(payload: &Payload, key: &str, default: &str) -> String {
    optional_text(payload, key).unwrap_or_else(|| default.to_string())
}

/// String form of a reply field when present and non-null.
pub fn optional_text(payload: &Payload, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Decoded list field; `[]` when absent or not decodable.
pub fn decoded_list(payload: &Payload, key: &str) -> Value {
    match payload.get(key) {
        Some(value @ (Value::Array(_) | Value::Object(_))) => value.clone(),
        Some(value) => decode_json_text(value).unwrap_or_else(|| Value::Array(Vec::new())),
        None => Value::Array(Vec::new()),
    }
}
