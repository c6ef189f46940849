//! TCP client for the command engine.
//!
//! # Responsibilities
//! - Open one connection per command
//! - Write the framed request, read the framed reply
//! - Bound connect and read phases with configured timeouts

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::backend::protocol;
use crate::backend::types::{CommandEngine, CommandParams, EngineError, EngineReply};
use crate::config::BackendConfig;

/// Largest status line + header block accepted from the engine.
const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Largest reply body accepted from the engine.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const READ_CHUNK: usize = 8 * 1024;

/// Command engine client speaking the line-oriented TCP protocol.
#[derive(Debug, Clone)]
pub struct TcpCommandClient {
    address: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TcpCommandClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            address: config.address.clone(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            read_timeout: Duration::from_secs(config.read_timeout_secs),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> Result<TcpStream, EngineError> {
        match timeout(self.connect_timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(EngineError::Connect {
                address: self.address.clone(),
                source,
            }),
            Err(_) => Err(EngineError::Timeout {
                phase: "connect",
                secs: self.connect_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl CommandEngine for TcpCommandClient {
    async fn execute(&self, command: &str, params: &CommandParams) -> Result<EngineReply, EngineError> {
        let request = protocol::encode_request(command, params)?;
        let mut stream = self.connect().await?;

        timeout(self.read_timeout, exchange(&mut stream, &request))
            .await
            .map_err(|_| EngineError::Timeout {
                phase: "read",
                secs: self.read_timeout.as_secs(),
            })?
    }
}

async fn exchange(stream: &mut TcpStream, request: &[u8]) -> Result<EngineReply, EngineError> {
    stream.write_all(request).await?;
    stream.flush().await?;

    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    let head_end = loop {
        if let Some(pos) = protocol::find_head_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Err(EngineError::Protocol("reply header too large".to_string()));
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(EngineError::Protocol(
                "connection closed before reply header".to_string(),
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head_text = std::str::from_utf8(&buf[..head_end])
        .map_err(|_| EngineError::Protocol("reply header is not UTF-8".to_string()))?;
    let head = protocol::parse_head(head_text)?;
    if head.content_length > MAX_BODY_BYTES {
        return Err(EngineError::Protocol(format!(
            "reply body of {} bytes exceeds {MAX_BODY_BYTES}",
            head.content_length
        )));
    }

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < head.content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(EngineError::Protocol(
                "connection closed before reply body completed".to_string(),
            ));
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(head.content_length);

    Ok(protocol::into_reply(head, &body))
}
