//! Typed parameter primitives.
//!
//! # Responsibilities
//! - Coerce raw query/body values into strings, integers, booleans, JSON arrays
//! - Enforce presence, length, item-count and numeric bounds
//! - Validate named route captures
//!
//! # Design Decisions
//! - String lengths are measured in bytes
//! - Strict integers never clamp; lenient integers never fail
//! - Booleans accept exactly true/false/1/0, no implicit truthiness
//! - JSON arrays must decode to a sequence; keyed objects are rejected

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::params::input::RequestInput;

/// Upper bound for short text fields (names, titles, questions).
pub const MAX_SIZE_SMALL: usize = 255;

/// Upper bound for long text fields (message bodies, free-text answers).
pub const MAX_SIZE_QUERY: usize = 1024 * 1024;

/// Named captures from a matched route pattern.
pub type RouteParams = HashMap<String, String>;

/// Tri-state value for partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Key not supplied: leave the stored value alone.
    #[default]
    Unchanged,
    /// Key supplied as empty/null: clear the stored value.
    Clear,
    /// Key supplied with a value.
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Scalar text form of a raw value. `None` for null, arrays and objects.
fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Trimmed text for `key`, or `None` when the key carries no value.
fn trimmed(input: &RequestInput, key: &str) -> ApiResult<Option<String>> {
    match input.raw(key) {
        None => Ok(None),
        Some(raw) => scalar_text(raw)
            .map(|text| Some(text.trim().to_string()))
            .ok_or_else(|| ApiError::invalid(key)),
    }
}

/// Required, trimmed string within `[min_len, max_len]` bytes.
///
/// Absent, empty, or shorter than `min_len` is a missing parameter; longer
/// than `max_len` is invalid.
pub fn require_string(
    input: &RequestInput,
    key: &str,
    min_len: usize,
    max_len: Option<usize>,
) -> ApiResult<String> {
    let value = trimmed(input, key)?.unwrap_or_default();
    if value.is_empty() || value.len() < min_len {
        return Err(ApiError::missing(key));
    }
    if max_len.is_some_and(|max| value.len() > max) {
        return Err(ApiError::invalid(key));
    }
    Ok(value)
}

/// Optional, trimmed string.
///
/// Returns `None` only when the key was not supplied (or supplied as JSON
/// null). A supplied value that is empty after trimming, or outside the
/// length bounds, is invalid.
pub fn optional_string(
    input: &RequestInput,
    key: &str,
    min_len: usize,
    max_len: Option<usize>,
) -> ApiResult<Option<String>> {
    if !input.has(key) {
        return Ok(None);
    }
    let Some(value) = trimmed(input, key)? else {
        return Ok(None);
    };
    if value.is_empty() || value.len() < min_len {
        return Err(ApiError::invalid(key));
    }
    if max_len.is_some_and(|max| value.len() > max) {
        return Err(ApiError::invalid(key));
    }
    Ok(Some(value))
}

/// Best-effort integer: takes the leading numeric prefix, clamps to bounds.
///
/// Garbage coerces to 0 before clamping. Absent keys yield `default`.
pub fn lenient_int(
    input: &RequestInput,
    key: &str,
    default: Option<i64>,
    min: Option<i64>,
    max: Option<i64>,
) -> Option<i64> {
    let raw = match input.raw(key) {
        Some(raw) => raw,
        None => return default,
    };

    let mut value = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => leading_int(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    };

    if let Some(min) = min {
        value = value.max(min);
    }
    if let Some(max) = max {
        value = value.min(max);
    }
    Some(value)
}

/// Leading `[+-]digits` prefix of `text`, saturating on overflow; 0 if none.
fn leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    value
}

/// Parse a well-formed base-10 integer: optional sign, then ASCII digits only.
fn parse_decimal(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn strict_value(raw: &Value, key: &str) -> ApiResult<i64> {
    match raw {
        Value::Number(n) => n.as_i64().ok_or_else(|| ApiError::invalid(key)),
        Value::String(s) => {
            let text = s.trim();
            if text.is_empty() {
                return Err(ApiError::missing(key));
            }
            parse_decimal(text).ok_or_else(|| ApiError::invalid(key))
        }
        _ => Err(ApiError::invalid(key)),
    }
}

fn check_bounds(value: i64, key: &str, min: Option<i64>, max: Option<i64>) -> ApiResult<i64> {
    if min.is_some_and(|min| value < min) || max.is_some_and(|max| value > max) {
        return Err(ApiError::invalid(key));
    }
    Ok(value)
}

/// Strict optional integer. Absent keys yield `None`; anything present must
/// be a well-formed integer within bounds.
pub fn strict_int(
    input: &RequestInput,
    key: &str,
    min: Option<i64>,
    max: Option<i64>,
) -> ApiResult<Option<i64>> {
    match input.raw(key) {
        None => Ok(None),
        Some(raw) => {
            let value = strict_value(raw, key)?;
            check_bounds(value, key, min, max).map(Some)
        }
    }
}

/// Strict required integer. Absent or empty is missing; malformed or out of
/// bounds is invalid.
pub fn require_int(
    input: &RequestInput,
    key: &str,
    min: Option<i64>,
    max: Option<i64>,
) -> ApiResult<i64> {
    strict_int(input, key, min, max)?.ok_or_else(|| ApiError::missing(key))
}

/// Strict integer that is validated only when the client supplied a value.
///
/// JSON null counts as not supplied.
pub fn optional_int(
    input: &RequestInput,
    key: &str,
    min: Option<i64>,
    max: Option<i64>,
) -> ApiResult<Option<i64>> {
    if input.raw(key).is_none() {
        return Ok(None);
    }
    require_int(input, key, min, max).map(Some)
}

/// Tri-state integer for partial updates.
///
/// Absent → [`Patch::Unchanged`]; empty, JSON null or the literal `null`
/// (any case) → [`Patch::Clear`]; otherwise a strict integer ≥ `min`.
pub fn nullable_int(input: &RequestInput, key: &str, min: Option<i64>) -> ApiResult<Patch<i64>> {
    if !input.has(key) {
        return Ok(Patch::Unchanged);
    }
    let text = trimmed(input, key)?.unwrap_or_default();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return Ok(Patch::Clear);
    }
    require_int(input, key, min, None).map(Patch::Set)
}

/// Required boolean: exactly `true`, `false`, `1` or `0` (word forms in any case).
pub fn require_bool(input: &RequestInput, key: &str) -> ApiResult<bool> {
    if let Some(Value::Bool(b)) = input.raw(key) {
        return Ok(*b);
    }
    let value = require_string(input, key, 1, None)?.to_ascii_lowercase();
    match value.as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ApiError::invalid(key)),
    }
}

/// Boolean validated only when the client supplied a value.
pub fn optional_bool(input: &RequestInput, key: &str) -> ApiResult<Option<bool>> {
    if input.raw(key).is_none() {
        return Ok(None);
    }
    require_bool(input, key).map(Some)
}

/// Required JSON array with `[min_items, max_items]` elements.
///
/// Accepts an already-structured sequence from a JSON body or a JSON-encoded
/// string. Anything that is not a sequence (including a keyed object) is
/// invalid.
pub fn require_json_array(
    input: &RequestInput,
    key: &str,
    min_items: Option<usize>,
    max_items: Option<usize>,
) -> ApiResult<Vec<Value>> {
    let raw = input.raw(key).ok_or_else(|| ApiError::missing(key))?;

    let items = match raw {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Array(items)) => items,
            _ => return Err(ApiError::invalid(key)),
        },
        _ => return Err(ApiError::invalid(key)),
    };

    let count = items.len();
    if min_items.is_some_and(|min| count < min) || max_items.is_some_and(|max| count > max) {
        return Err(ApiError::invalid(key));
    }
    Ok(items)
}

/// JSON array validated only when the client supplied a value.
pub fn optional_json_array(
    input: &RequestInput,
    key: &str,
    min_items: Option<usize>,
    max_items: Option<usize>,
) -> ApiResult<Option<Vec<Value>>> {
    if input.raw(key).is_none() {
        return Ok(None);
    }
    require_json_array(input, key, min_items, max_items).map(Some)
}

/// Compact JSON text for a validated array, as sent to the backend.
pub fn encode_json_array(items: &[Value], key: &str) -> ApiResult<String> {
    serde_json::to_string(items).map_err(|_| ApiError::invalid(key))
}

/// Required route capture as a trimmed string within `[min_len, max_len]` bytes.
pub fn require_route_string(
    route: &RouteParams,
    key: &str,
    min_len: usize,
    max_len: Option<usize>,
) -> ApiResult<String> {
    let raw = route
        .get(key)
        .ok_or_else(|| ApiError::MissingRouteParameter(key.to_string()))?;

    let value = raw.trim();
    if value.is_empty()
        || value.len() < min_len
        || max_len.is_some_and(|max| value.len() > max)
    {
        return Err(ApiError::InvalidRouteParameter(key.to_string()));
    }
    Ok(value.to_string())
}

/// Required route capture as an integer ≥ `min`.
///
/// The capture must consist solely of ASCII digits; signs and Unicode digits
/// that a pattern's `\d` may admit are rejected.
pub fn require_route_int(route: &RouteParams, key: &str, min: i64) -> ApiResult<i64> {
    let raw = route
        .get(key)
        .ok_or_else(|| ApiError::MissingRouteParameter(key.to_string()))?;

    let invalid = || ApiError::InvalidRouteParameter(key.to_string());
    let value = raw.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let number: i64 = value.parse().map_err(|_| invalid())?;
    if number < min {
        return Err(invalid());
    }
    Ok(number)
}
