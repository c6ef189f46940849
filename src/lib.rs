//! HTTP command gateway.
//!
//! Binds HTTP requests to typed, validated request objects, forwards each as
//! a named command to a backend command engine, and shapes the reply into a
//! stable JSON response.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http (server, middleware) ──▶ routing (registry + binder)
//!                                                   │ params (extraction)
//!                                                   ▼
//!     Client ◀── responses (models) ◀── backend (proxy ──▶ TCP command client) ──▶ Engine
//!
//!     Cross-cutting: config · observability · lifecycle · error
//! ```

// Core subsystems
pub mod backend;
pub mod http;
pub mod params;
pub mod requests;
pub mod responses;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
