//! Backend command engine integration.
//!
//! # Data Flow
//! ```text
//! Bound request
//!     → CommandParams (flat string map)
//!     → proxy.rs (CommandProxy: call, interpret reply, map failures)
//!     → CommandEngine trait
//!         → client.rs (TcpCommandClient, one connection per call)
//!         → protocol.rs (request framing, reply parsing)
//!     ← EngineReply (code, status line, headers, body)
//!     ← Payload, or ApiError (backend status / 502)
//! ```
//!
//! # Design Decisions
//! - The engine is injected as `Arc<dyn CommandEngine>`; no global client
//! - Parameters are strings only at this boundary
//! - No retries, pooling or failover: one call, one outcome
//! - Transport errors are logged in full and surfaced only as 502

pub mod client;
pub mod protocol;
pub mod proxy;
pub mod types;

pub use client::TcpCommandClient;
pub use proxy::CommandProxy;
pub use types::{CommandEngine, CommandParams, EngineError, EngineReply};
