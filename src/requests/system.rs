//! Liveness and hello-world requests.

use crate::backend::CommandParams;
use crate::error::ApiResult;
use crate::params::extract::optional_string;
use crate::params::{Payload, RequestInput, RouteParams, MAX_SIZE_SMALL};
use crate::responses::system::{HelloWorldResponse, StatusResponse};
use crate::responses::BoxedResponse;
use crate::routing::{ExecutionContext, RouteRequest, RouteType};

/// `GET /api/status`, answered without the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest;

impl RouteType for StatusRequest {
    const NAME: &'static str = "Status";
    const PATTERN: &'static str = r"^/api/status$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = None;

    fn bind(_: &RouteParams, _: &RequestInput) -> ApiResult<Self> {
        Ok(Self)
    }
}

impl RouteRequest for StatusRequest {
    fn execute_local(&self, ctx: &ExecutionContext) -> ApiResult<BoxedResponse> {
        Ok(Box::new(StatusResponse::now(&ctx.service_name)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloWorldRequest {
    pub name: String,
}

impl RouteType for HelloWorldRequest {
    const NAME: &'static str = "HelloWorld";
    const PATTERN: &'static str = r"^/api/hello$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("HelloWorld");

    fn bind(_: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        let name = optional_string(input, "name", 1, Some(MAX_SIZE_SMALL))?;
        Ok(Self {
            name: name.unwrap_or_else(|| "World".to_string()),
        })
    }
}

impl RouteRequest for HelloWorldRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new().with("name", &self.name)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(HelloWorldResponse::from_reply(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    fn query(raw: &str) -> RequestInput {
        RequestInput::from_http(Some(raw), None, b"")
    }

    #[test]
    fn test_hello_defaults_to_world() {
        let request = HelloWorldRequest::bind(&RouteParams::new(), &RequestInput::default()).unwrap();
        assert_eq!(request.to_command_params().get("name"), Some("World"));
    }

    #[test]
    fn test_hello_name_trimmed() {
        let request = HelloWorldRequest::bind(&RouteParams::new(), &query("name=%20Ada%20")).unwrap();
        assert_eq!(request.name, "Ada");
    }

    #[test]
    fn test_hello_empty_name_rejected() {
        let err = HelloWorldRequest::bind(&RouteParams::new(), &query("name=")).unwrap_err();
        assert_eq!(err, ApiError::InvalidParameter("name".into()));
    }

    #[test]
    fn test_hello_reply_shaped() {
        let reply = json!({"message": "Hello, Ada!"}).as_object().cloned().unwrap();
        let wire = HelloWorldRequest { name: "Ada".into() }.transform_response(reply).to_wire();
        assert_eq!(wire["message"], "Hello, Ada!");
        assert_eq!(wire["plugin_name"], "");
    }
}
