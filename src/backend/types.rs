//! Command engine types and error definitions.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::params::Payload;

/// Flat parameter mapping sent with a backend command.
///
/// Ordered by key so the wire form of a request is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandParams(BTreeMap<String, String>);

impl CommandParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Insert only when a value is present.
    pub fn insert_opt<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for CommandParams {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut params = Self::new();
        for (k, v) in pairs {
            params.insert(k, v);
        }
        params
    }
}

/// Raw reply from the command engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineReply {
    /// Numeric status; 0 when the status line carries no number.
    pub code: u16,
    /// Full status line, e.g. `404 Poll not found`.
    pub code_line: String,
    /// Header-shaped reply data.
    pub headers: Payload,
    /// Body-shaped reply data: structured when it parsed as JSON, raw text otherwise.
    pub body: Option<Value>,
}

impl EngineReply {
    /// A successful reply carrying `headers`.
    pub fn ok(headers: Payload) -> Self {
        Self {
            code: 200,
            code_line: "200 OK".to_string(),
            headers,
            body: None,
        }
    }
}

/// Errors talking to the command engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// TCP connection could not be established.
    #[error("failed to connect to command engine at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine did not answer in time.
    #[error("command engine {phase} timed out after {secs} seconds")]
    Timeout { phase: &'static str, secs: u64 },

    /// Socket read/write failure.
    #[error("command engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed request or reply framing.
    #[error("command engine protocol error: {0}")]
    Protocol(String),

    /// The call faulted before producing a reply.
    #[error("command engine call aborted: {0}")]
    Aborted(String),
}

/// A backend that executes named commands.
#[async_trait]
pub trait CommandEngine: Send + Sync {
    /// Execute `command` with `params` and return the raw reply.
    async fn execute(&self, command: &str, params: &CommandParams) -> Result<EngineReply, EngineError>;
}

impl fmt::Debug for dyn CommandEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CommandEngine")
    }
}
