//! Ordered registry of request types.
//!
//! # Responsibilities
//! - Hold one descriptor per request type, in registration order
//! - Compile every path pattern at startup
//! - Reject duplicate route names and routes without methods
//!
//! # Design Decisions
//! - Order is precedence: earlier routes win when patterns overlap
//! - Built once, shared read-only behind an `Arc`

use std::fmt;

use thiserror::Error;

use crate::error::ApiResult;
use crate::params::{RequestInput, RouteParams};
use crate::routing::contract::{BoundRequest, RouteRequest, RouteType};
use crate::routing::matcher::{MethodSet, RoutePattern};

/// Errors building the registry at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("route {route} has an invalid pattern: {source}")]
    InvalidPattern {
        route: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("route {0} is registered twice")]
    DuplicateRoute(&'static str),

    #[error("route {0} declares no HTTP methods")]
    NoMethods(&'static str),
}

type BindFn = fn(&RouteParams, &RequestInput) -> ApiResult<Box<dyn RouteRequest>>;

fn bind_boxed<T: RouteType>(
    route: &RouteParams,
    input: &RequestInput,
) -> ApiResult<Box<dyn RouteRequest>> {
    Ok(Box::new(T::bind(route, input)?))
}

/// Static, compiled description of one request type.
#[derive(Clone)]
pub struct RouteDescriptor {
    name: &'static str,
    pattern: RoutePattern,
    methods: MethodSet,
    command: Option<&'static str>,
    binder: BindFn,
}

impl RouteDescriptor {
    /// Describe request type `T`.
    pub fn of<T: RouteType>() -> Result<Self, RegistryError> {
        let pattern = RoutePattern::new(T::PATTERN).map_err(|source| {
            RegistryError::InvalidPattern {
                route: T::NAME,
                source,
            }
        })?;
        let methods = MethodSet::new(T::METHODS);
        if methods.is_empty() {
            return Err(RegistryError::NoMethods(T::NAME));
        }

        Ok(Self {
            name: T::NAME,
            pattern,
            methods,
            command: T::COMMAND,
            binder: bind_boxed::<T>,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    pub fn command(&self) -> Option<&'static str> {
        self.command
    }

    /// Bind raw input through this type's binder.
    pub fn bind(&self, route: &RouteParams, input: &RequestInput) -> ApiResult<BoundRequest> {
        let request = (self.binder)(route, input)?;
        Ok(BoundRequest::new(self.name, self.command, request))
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("methods", &self.methods)
            .field("command", &self.command)
            .finish()
    }
}

/// Ordered sequence of route descriptors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    routes: Vec<RouteDescriptor>,
}

impl Registry {
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RegistryError> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|earlier| earlier.name == route.name) {
                return Err(RegistryError::DuplicateRoute(route.name));
            }
        }
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.name == name)
    }
}
