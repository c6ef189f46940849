//! Route binder: (method, path) → at most one bound request.
//!
//! # Responsibilities
//! - Walk the registry in order, checking the method before the pattern
//! - Bind the first match through its type's binder
//! - On no match, tell 405 (path known, method not) apart from 404
//!
//! # Design Decisions
//! - First registered, first matched
//! - Validation failures from the winning binder propagate; later routes are
//!   never tried once a route has matched

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::params::RequestInput;
use crate::routing::contract::BoundRequest;
use crate::routing::registry::Registry;

/// Result of resolving a request against the registry.
#[derive(Debug)]
pub enum BindOutcome {
    Bound(BoundRequest),
    /// The path is registered for these methods only (sorted, de-duplicated).
    MethodNotAllowed(Vec<String>),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct RouteBinder {
    registry: Arc<Registry>,
}

impl RouteBinder {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Bind the first route accepting `method` whose pattern matches `path`.
    pub fn try_bind(
        &self,
        method: &str,
        path: &str,
        input: &RequestInput,
    ) -> ApiResult<Option<BoundRequest>> {
        for route in self.registry.routes() {
            if !route.methods().contains(method) {
                continue;
            }
            if let Some(params) = route.pattern().captures(path) {
                tracing::debug!(route = route.name(), path = %path, "Route matched");
                return route.bind(&params, input).map(Some);
            }
        }
        Ok(None)
    }

    /// Union of methods across every route whose pattern matches `path`.
    pub fn allowed_methods_for_path(&self, path: &str) -> Vec<String> {
        self.registry
            .routes()
            .iter()
            .filter(|route| route.pattern().is_match(path))
            .flat_map(|route| route.methods().iter().map(str::to_string))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bind, or explain why nothing bound.
    pub fn resolve(&self, method: &str, path: &str, input: &RequestInput) -> ApiResult<BindOutcome> {
        if let Some(bound) = self.try_bind(method, path, input)? {
            return Ok(BindOutcome::Bound(bound));
        }

        let allowed = self.allowed_methods_for_path(path);
        if allowed.is_empty() {
            Ok(BindOutcome::NotFound)
        } else {
            Ok(BindOutcome::MethodNotAllowed(allowed))
        }
    }
}
