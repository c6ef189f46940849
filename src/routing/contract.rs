//! The contract every request type implements.
//!
//! # Responsibilities
//! - Describe a route statically: name, path pattern, methods, command
//! - Bind raw input into a validated, typed instance
//! - Convert the instance into command parameters
//! - Shape the backend reply into a response model
//!
//! # Design Decisions
//! - Static route metadata lives in associated constants on [`RouteType`];
//!   the object-safe [`RouteRequest`] carries per-request behavior
//! - A type without a backend command answers through `execute_local`
//! - Bound requests are immutable and used once

use std::fmt;

use crate::backend::{CommandParams, CommandProxy};
use crate::error::{ApiError, ApiResult};
use crate::params::{Payload, RequestInput, RouteParams};
use crate::responses::{BoxedResponse, PassThroughResponse};

/// Collaborators available while a bound request executes.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub proxy: CommandProxy,
    /// Service name reported by locally handled routes.
    pub service_name: String,
}

/// Per-request behavior of a bound request.
pub trait RouteRequest: fmt::Debug + Send + Sync {
    /// Flat parameters sent with the backend command. Optional fields appear
    /// only when the client supplied them.
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
    }

    /// Shape the backend reply for the client.
    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(PassThroughResponse::new(reply))
    }

    /// Answer without calling the backend. Only used by routes with no command.
    fn execute_local(&self, _ctx: &ExecutionContext) -> ApiResult<BoxedResponse> {
        Err(ApiError::Internal(format!(
            "{self:?} has neither a backend command nor a local handler"
        )))
    }
}

/// Static description and binder of one endpoint-operation pair.
pub trait RouteType: RouteRequest + Sized + 'static {
    /// Unique route name, used in logs and metrics.
    const NAME: &'static str;

    /// Anchored path pattern with named capture groups.
    const PATTERN: &'static str;

    /// HTTP methods this type accepts.
    const METHODS: &'static [&'static str];

    /// Backend command, or `None` for locally handled routes.
    const COMMAND: Option<&'static str>;

    /// Validate route captures plus query/body input into an instance.
    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self>;
}

/// A validated request ready to execute.
#[derive(Debug)]
pub struct BoundRequest {
    route: &'static str,
    command: Option<&'static str>,
    request: Box<dyn RouteRequest>,
}

impl BoundRequest {
    pub fn new(
        route: &'static str,
        command: Option<&'static str>,
        request: Box<dyn RouteRequest>,
    ) -> Self {
        Self {
            route,
            command,
            request,
        }
    }

    pub fn route_name(&self) -> &'static str {
        self.route
    }

    pub fn command(&self) -> Option<&'static str> {
        self.command
    }

    pub fn command_params(&self) -> CommandParams {
        self.request.to_command_params()
    }

    /// Run the request: call the backend command, or answer locally.
    pub async fn execute(&self, ctx: &ExecutionContext) -> ApiResult<BoxedResponse> {
        match self.command {
            Some(command) => {
                let params = self.request.to_command_params();
                let reply = ctx.proxy.call(command, &params).await?;
                Ok(self.request.transform_response(reply))
            }
            None => self.request.execute_local(ctx),
        }
    }
}
