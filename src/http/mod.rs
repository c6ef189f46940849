//! HTTP front of the gateway.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → server.rs (middleware, fallback handler, body buffering)
//!     → request.rs (request ID, query/body decoding)
//!     → routing (bind) → backend (command call) → responses (shape)
//!     → response.rs (error envelope) or JSON response model
//!     → Client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
