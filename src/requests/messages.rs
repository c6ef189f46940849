//! Global message board requests.

use crate::backend::CommandParams;
use crate::error::ApiResult;
use crate::params::extract::{require_int, require_string, strict_int};
use crate::params::{Payload, RequestInput, RouteParams, MAX_SIZE_QUERY, MAX_SIZE_SMALL};
use crate::responses::messages::{CreateMessageResponse, GetMessagesResponse};
use crate::responses::BoxedResponse;
use crate::routing::{RouteRequest, RouteType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMessagesRequest {
    pub limit: Option<i64>,
}

impl RouteType for GetMessagesRequest {
    const NAME: &'static str = "GetMessages";
    const PATTERN: &'static str = r"^/api/messages$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("GetMessages");

    fn bind(_: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            limit: strict_int(input, "limit", Some(1), Some(100))?,
        })
    }
}

impl RouteRequest for GetMessagesRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new();
        params.insert_opt("limit", self.limit);
        params
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(GetMessagesResponse::from_reply(reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMessageRequest {
    pub user_id: i64,
    pub name: String,
    pub message: String,
}

impl RouteType for CreateMessageRequest {
    const NAME: &'static str = "CreateMessage";
    const PATTERN: &'static str = r"^/api/messages$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("CreateMessage");

    fn bind(_: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            user_id: require_int(input, "userID", Some(1), None)?,
            name: require_string(input, "name", 1, Some(MAX_SIZE_SMALL))?,
            message: require_string(input, "message", 1, Some(MAX_SIZE_QUERY))?,
        })
    }
}

impl RouteRequest for CreateMessageRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("userID", self.user_id)
            .with("name", &self.name)
            .with("message", &self.message)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(CreateMessageResponse::from_reply(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn json_body(body: &str) -> RequestInput {
        RequestInput::from_http(None, Some("application/json"), body.as_bytes())
    }

    #[test]
    fn test_limit_optional_and_bounded() {
        let request = GetMessagesRequest::bind(&RouteParams::new(), &RequestInput::default()).unwrap();
        assert!(request.to_command_params().is_empty());

        let err = GetMessagesRequest::bind(&RouteParams::new(), &json_body(r#"{"limit": 101}"#)).unwrap_err();
        assert_eq!(err, ApiError::InvalidParameter("limit".into()));
    }

    #[test]
    fn test_create_message() {
        let request = CreateMessageRequest::bind(
            &RouteParams::new(),
            &json_body(r#"{"userID": "3", "name": "Ada", "message": "  hello  "}"#),
        )
        .unwrap();
        let params = request.to_command_params();
        assert_eq!(params.get("userID"), Some("3"));
        assert_eq!(params.get("message"), Some("hello"));
    }

    #[test]
    fn test_create_message_requires_user() {
        let err = CreateMessageRequest::bind(&RouteParams::new(), &json_body(r#"{"name": "Ada", "message": "hi"}"#))
            .unwrap_err();
        assert_eq!(err, ApiError::MissingParameter("userID".into()));
    }
}
