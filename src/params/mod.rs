//! Parameter extraction and validation subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → input.rs (decode query string + body into RequestInput)
//!     → extract.rs (typed primitives: strings, ints, bools, JSON arrays)
//!     → typed request fields, or ApiError (400)
//!
//! Route captures (from routing::matcher)
//!     → extract.rs (require_route_string / require_route_int)
//! ```
//!
//! # Design Decisions
//! - Single source of truth for turning untrusted wire input into typed values
//! - Query string wins over body when both carry the same key
//! - Absence is distinct from emptiness: optional fields return `None` only
//!   when the key was not supplied at all

pub mod extract;
pub mod input;

pub use extract::{Patch, RouteParams, MAX_SIZE_QUERY, MAX_SIZE_SMALL};
pub use input::{Payload, RequestInput};
