//! Command proxy: one backend call, one interpreted outcome.
//!
//! # Responsibilities
//! - Invoke the command engine with normalized parameters
//! - Pick the reply channel that carries data on success
//! - Map backend failures into the client-facing error taxonomy
//! - Contain transport faults as 502
//!
//! # Design Decisions
//! - Success prefers header-shaped data, then body-shaped data, then empty
//! - Failure status comes from the status line, clamped to 400..=599 with a
//!   502 fallback
//! - The engine call runs in its own task so that a panicking engine
//!   surfaces as a transport failure

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use serde_json::Value;

use crate::backend::types::{CommandEngine, CommandParams, EngineError, EngineReply};
use crate::error::{ApiError, ApiResult};
use crate::observability::metrics;
use crate::params::Payload;

const UNKNOWN_BACKEND_ERROR: &str = "Unknown backend error";

/// Calls the command engine and interprets its replies.
#[derive(Clone)]
pub struct CommandProxy {
    engine: Arc<dyn CommandEngine>,
}

impl CommandProxy {
    pub fn new(engine: Arc<dyn CommandEngine>) -> Self {
        Self { engine }
    }

    /// Execute `command` and return its reply data.
    pub async fn call(&self, command: &str, params: &CommandParams) -> ApiResult<Payload> {
        let start = Instant::now();
        tracing::info!(command = %command, params = params.len(), "Calling backend command");

        let reply = match self.dispatch(command, params).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(command = %command, error = %e, "Backend call failed");
                metrics::record_backend_call(command, "transport_error", start);
                return Err(ApiError::Transport);
            }
        };

        let result = interpret_reply(command, reply);
        let outcome = if result.is_ok() { "ok" } else { "backend_error" };
        metrics::record_backend_call(command, outcome, start);
        result
    }

    async fn dispatch(&self, command: &str, params: &CommandParams) -> Result<EngineReply, EngineError> {
        let engine = Arc::clone(&self.engine);
        let command = command.to_string();
        let params = params.clone();

        tokio::spawn(async move { engine.execute(&command, &params).await })
            .await
            .map_err(|e| EngineError::Aborted(e.to_string()))?
    }
}

impl std::fmt::Debug for CommandProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandProxy").finish_non_exhaustive()
    }
}

/// Turn a raw engine reply into reply data or a backend failure.
pub fn interpret_reply(command: &str, reply: EngineReply) -> ApiResult<Payload> {
    if reply.code == 200 {
        if !reply.headers.is_empty() {
            return Ok(reply.headers);
        }
        return match reply.body {
            Some(Value::Object(body)) if !body.is_empty() => Ok(body),
            _ => Ok(Payload::new()),
        };
    }

    let code_line = match reply.code_line.trim() {
        "" => UNKNOWN_BACKEND_ERROR,
        line => line,
    };
    let status = backend_status(code_line);

    let mut message = code_line.to_string();
    if let Some(detail) = body_error(reply.body.as_ref()) {
        if !message.to_lowercase().contains(&detail.to_lowercase()) {
            message.push_str(" - ");
            message.push_str(&detail);
        }
    }

    let error_code = reply
        .headers
        .get("errorCode")
        .and_then(Value::as_str)
        .unwrap_or_default();
    tracing::error!(
        command = %command,
        status = status.as_u16(),
        code_line = %code_line,
        error_code = %error_code,
        "Backend command failed"
    );

    Err(ApiError::Backend { status, message })
}

/// Client status for a failed reply's status line.
pub fn backend_status(code_line: &str) -> StatusCode {
    let digits: String = code_line
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    match digits.parse::<u16>() {
        Ok(code) if (400..=599).contains(&code) => {
            StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Nested `error` message from a reply body, which may itself be JSON text.
fn body_error(body: Option<&Value>) -> Option<String> {
    let error = match body? {
        Value::Object(map) => map.get("error").cloned(),
        Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Object(map)) => map.get("error").cloned(),
            _ => None,
        },
        _ => None,
    }?;

    let text = match error {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => Payload::new(),
        }
    }

    fn failure(code_line: &str, body: Option<Value>) -> EngineReply {
        EngineReply {
            code: crate::backend::protocol::leading_code(code_line),
            code_line: code_line.to_string(),
            headers: Payload::new(),
            body,
        }
    }

    /// Returns a canned reply and records the last call.
    struct CannedEngine {
        reply: Result<EngineReply, String>,
        calls: Mutex<Vec<(String, CommandParams)>>,
    }

    #[async_trait]
    impl CommandEngine for CannedEngine {
        async fn execute(&self, command: &str, params: &CommandParams) -> Result<EngineReply, EngineError> {
            self.calls
                .lock()
                .unwrap()
                .push((command.to_string(), params.clone()));
            self.reply.clone().map_err(EngineError::Protocol)
        }
    }

    struct PanickingEngine;

    #[async_trait]
    impl CommandEngine for PanickingEngine {
        async fn execute(&self, _: &str, _: &CommandParams) -> Result<EngineReply, EngineError> {
            panic!("engine exploded");
        }
    }

    #[test]
    fn test_success_prefers_headers() {
        let reply = EngineReply {
            code: 200,
            code_line: "200 OK".into(),
            headers: payload(json!({"pollID": "7"})),
            body: Some(json!({"question": "ignored"})),
        };
        assert_eq!(interpret_reply("GetPoll", reply).unwrap(), payload(json!({"pollID": "7"})));
    }

    #[test]
    fn test_success_falls_back_to_body_then_empty() {
        let reply = EngineReply {
            code: 200,
            body: Some(json!({"polls": "[]"})),
            ..Default::default()
        };
        assert_eq!(interpret_reply("GetPolls", reply).unwrap(), payload(json!({"polls": "[]"})));

        let reply = EngineReply {
            code: 200,
            body: Some(json!("plain text")),
            ..Default::default()
        };
        assert!(interpret_reply("GetPolls", reply).unwrap().is_empty());
    }

    #[test]
    fn test_custom_failure_status_and_message() {
        let err = interpret_reply("CreatePoll", failure("500 Custom Failure", None)).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("Custom Failure"));
    }

    #[test]
    fn test_out_of_range_status_is_bad_gateway() {
        for line in ["302 Moved", "Broken", "", "700 Beyond"] {
            let err = interpret_reply("GetPoll", failure(line, None)).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_GATEWAY, "line {line:?}");
        }
        let err = interpret_reply("GetPoll", failure("", None)).unwrap_err();
        assert_eq!(err.to_string(), "Unknown backend error");
    }

    #[test]
    fn test_body_error_appended_once() {
        let err = interpret_reply(
            "SubmitVote",
            failure("409 Conflict", Some(json!({"error": "Already voted"}))),
        )
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "409 Conflict - Already voted");

        let err = interpret_reply(
            "GetPoll",
            failure("404 Poll not found", Some(json!({"error": "poll NOT found"}))),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "404 Poll not found");
    }

    #[test]
    fn test_body_error_from_json_text() {
        let err = interpret_reply(
            "EditPoll",
            failure("400 Bad poll", Some(json!(r#"{"error":"expiresAt in the past"}"#))),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "400 Bad poll - expiresAt in the past");
    }

    #[tokio::test]
    async fn test_call_forwards_params() {
        let engine = Arc::new(CannedEngine {
            reply: Ok(EngineReply::ok(payload(json!({"result": "deleted"})))),
            calls: Mutex::new(Vec::new()),
        });
        let proxy = CommandProxy::new(engine.clone());

        let params = CommandParams::new().with("pollID", 9);
        let result = proxy.call("DeletePoll", &params).await.unwrap();
        assert_eq!(result.get("result"), Some(&json!("deleted")));

        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls[0].0, "DeletePoll");
        assert_eq!(calls[0].1.get("pollID"), Some("9"));
    }

    #[tokio::test]
    async fn test_transport_error_is_502() {
        let engine = Arc::new(CannedEngine {
            reply: Err("connection reset".into()),
            calls: Mutex::new(Vec::new()),
        });
        let err = CommandProxy::new(engine)
            .call("GetPolls", &CommandParams::new())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Transport);
        assert_eq!(err.to_string(), "Error connecting to backend");
    }

    #[tokio::test]
    async fn test_engine_panic_is_502() {
        let err = CommandProxy::new(Arc::new(PanickingEngine))
            .call("GetPolls", &CommandParams::new())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Transport);
    }
}
