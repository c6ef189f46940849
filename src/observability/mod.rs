//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http::server, backend::proxy
//!     → logging.rs (tracing subscriber: pretty or JSON, EnvFilter)
//!     → metrics.rs (request and backend-call counters and histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint, when enabled
//! ```
//!
//! # Design Decisions
//! - Every request log line carries the request ID
//! - Labels are route and command names, never raw paths or parameters

pub mod logging;
pub mod metrics;
