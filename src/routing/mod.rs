//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, query, body)
//!     → binder.rs (walk registry in order)
//!     → matcher.rs (method check, then path pattern + captures)
//!     → contract.rs (winning type binds its fields)
//!     → Return: BoundRequest, 405 with allowed methods, or 404
//!
//! Registry construction (at startup):
//!     request types (RouteType impls)
//!     → registry.rs (compile patterns, check names)
//!     → frozen as immutable Registry behind Arc
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod binder;
pub mod contract;
pub mod matcher;
pub mod registry;

pub use binder::{BindOutcome, RouteBinder};
pub use contract::{BoundRequest, ExecutionContext, RouteRequest, RouteType};
pub use registry::{Registry, RegistryError, RouteDescriptor};
