//! Command engine wire framing.
//!
//! Request:
//! ```text
//! GetPoll\r\n
//! pollID: 7\r\n
//! Content-Length: 0\r\n
//! \r\n
//! ```
//!
//! Reply:
//! ```text
//! 200 OK\r\n
//! pollID: 7\r\n
//! Content-Length: 15\r\n
//! \r\n
//! {"question":""}
//! ```
//!
//! Parameter and header values escape `\`, CR and LF so that a value always
//! fits on one line.

use serde_json::Value;

use crate::backend::types::{CommandParams, EngineError, EngineReply};
use crate::params::Payload;

const CONTENT_LENGTH: &str = "Content-Length";

/// Parsed status line and header block of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyHead {
    pub code: u16,
    pub code_line: String,
    pub headers: Vec<(String, String)>,
    pub content_length: usize,
}

/// Frame `command` and `params` as a request.
pub fn encode_request(command: &str, params: &CommandParams) -> Result<Vec<u8>, EngineError> {
    if command.is_empty() || command.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(EngineError::Protocol(format!("invalid command name {command:?}")));
    }

    let mut out = String::with_capacity(64);
    out.push_str(command);
    out.push_str("\r\n");

    for (name, value) in params.iter() {
        if !valid_header_name(name) {
            return Err(EngineError::Protocol(format!("invalid parameter name {name:?}")));
        }
        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            return Err(EngineError::Protocol("Content-Length is reserved".to_string()));
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(&escape(value));
        out.push_str("\r\n");
    }

    out.push_str(CONTENT_LENGTH);
    out.push_str(": 0\r\n\r\n");
    Ok(out.into_bytes())
}

/// Position of the blank line ending the header block, if fully received.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Parse the status line and headers (everything before the blank line).
pub fn parse_head(text: &str) -> Result<ReplyHead, EngineError> {
    let mut lines = text.split("\r\n");
    let code_line = lines
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| EngineError::Protocol("empty status line".to_string()))?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| EngineError::Protocol(format!("malformed header line {line:?}")))?;
        let name = name.trim();
        let value = value.trim();

        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            content_length = value
                .parse()
                .map_err(|_| EngineError::Protocol(format!("invalid Content-Length {value:?}")))?;
            continue;
        }
        headers.push((name.to_string(), unescape(value)));
    }

    Ok(ReplyHead {
        code: leading_code(&code_line),
        code_line,
        headers,
        content_length,
    })
}

/// Combine a parsed head and its body bytes into a reply.
pub fn into_reply(head: ReplyHead, body: &[u8]) -> EngineReply {
    let headers: Payload = head
        .headers
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();

    EngineReply {
        code: head.code,
        code_line: head.code_line,
        headers,
        body: decode_body(body),
    }
}

fn decode_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let text = String::from_utf8_lossy(body);
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.into_owned())),
    }
}

/// Numeric prefix of a status line; 0 when there is none.
pub fn leading_code(code_line: &str) -> u16 {
    let digits: String = code_line
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

fn valid_header_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c == ':' || c.is_whitespace() || c.is_control())
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_request() {
        let params = CommandParams::new()
            .with("pollID", 7)
            .with("question", "line one\nline two");
        let bytes = encode_request("EditPoll", &params).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "EditPoll\r\npollID: 7\r\nquestion: line one\\nline two\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn test_encode_rejects_bad_names() {
        assert!(encode_request("Get Poll", &CommandParams::new()).is_err());
        assert!(encode_request("", &CommandParams::new()).is_err());
        let params = CommandParams::new().with("bad:name", 1);
        assert!(encode_request("GetPoll", &params).is_err());
    }

    #[test]
    fn test_parse_head_and_body() {
        let raw = "200 OK\r\npollID: 7\r\nnote: a\\nb\r\nContent-Length: 17";
        let head = parse_head(raw).unwrap();
        assert_eq!(head.code, 200);
        assert_eq!(head.content_length, 17);

        let reply = into_reply(head, br#"{"options":"[]"} "#);
        assert_eq!(reply.headers.get("pollID"), Some(&json!("7")));
        assert_eq!(reply.headers.get("note"), Some(&json!("a\nb")));
        assert!(reply.headers.get("Content-Length").is_none());
        assert_eq!(reply.body, Some(json!({"options": "[]"})));
    }

    #[test]
    fn test_non_json_body_is_raw_text() {
        let head = parse_head("500 Custom Failure\r\nContent-Length: 4").unwrap();
        let reply = into_reply(head, b"oops");
        assert_eq!(reply.code, 500);
        assert_eq!(reply.code_line, "500 Custom Failure");
        assert_eq!(reply.body, Some(json!("oops")));
    }

    #[test]
    fn test_leading_code() {
        assert_eq!(leading_code("404 Poll not found"), 404);
        assert_eq!(leading_code("  503 Busy"), 503);
        assert_eq!(leading_code("Broken"), 0);
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let original = "back\\slash\r\nnext";
        assert_eq!(unescape(&escape(original)), original);
    }

    #[test]
    fn test_find_head_end() {
        assert_eq!(find_head_end(b"200 OK\r\n\r\nbody"), Some(6));
        assert_eq!(find_head_end(b"200 OK\r\n"), None);
    }
}
