//! Raw request input: query string and body.
//!
//! # Responsibilities
//! - Decode the query string (form encoding, last repeated key wins)
//! - Decode the body as a JSON object or a form-encoded map
//! - Look up raw values with query-over-body precedence

use serde_json::{Map, Value};

/// A keyed JSON mapping. Used for decoded input and for backend replies.
pub type Payload = Map<String, Value>;

/// Untyped input collected from one HTTP request.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    query: Payload,
    body: Payload,
}

impl RequestInput {
    /// Build input from already-decoded query and body mappings.
    pub fn new(query: Payload, body: Payload) -> Self {
        Self { query, body }
    }

    /// Decode raw HTTP input.
    ///
    /// `content_type` selects form decoding for
    /// `application/x-www-form-urlencoded`; anything else is tried as JSON.
    /// A body that is not a keyed object is treated as empty.
    pub fn from_http(query: Option<&str>, content_type: Option<&str>, body: &[u8]) -> Self {
        let query = query.map(parse_form).unwrap_or_default();
        Self {
            query,
            body: parse_body(content_type, body),
        }
    }

    /// Raw value for `key`. The query string takes precedence over the body.
    ///
    /// JSON `null` counts as no value, but still makes [`has`](Self::has) true.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.query
            .get(key)
            .filter(|v| !v.is_null())
            .or_else(|| self.body.get(key).filter(|v| !v.is_null()))
    }

    /// True when the client supplied `key` anywhere, even with an empty or null value.
    pub fn has(&self, key: &str) -> bool {
        self.query.contains_key(key) || self.body.contains_key(key)
    }

    pub fn query(&self) -> &Payload {
        &self.query
    }

    pub fn body(&self) -> &Payload {
        &self.body
    }
}

/// Decode `a=1&b=2` into a mapping of string values.
pub fn parse_form(raw: &str) -> Payload {
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

fn parse_body(content_type: Option<&str>, body: &[u8]) -> Payload {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Payload::new();
    }

    let is_form = content_type
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
        .unwrap_or(false);

    if is_form {
        return match std::str::from_utf8(body) {
            Ok(text) => parse_form(text),
            Err(_) => Payload::new(),
        };
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Payload::new(),
    }
}
