//! User requests.

use crate::backend::CommandParams;
use crate::error::{ApiError, ApiResult};
use crate::params::extract::{optional_string, require_route_int, require_string};
use crate::params::{Payload, RequestInput, RouteParams, MAX_SIZE_SMALL};
use crate::responses::users::{DeleteUserResponse, EditUserResponse, GetUserResponse};
use crate::responses::BoxedResponse;
use crate::routing::{RouteRequest, RouteType};

/// Longest accepted email address, in bytes.
const MAX_EMAIL_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RouteType for CreateUserRequest {
    const NAME: &'static str = "CreateUser";
    const PATTERN: &'static str = r"^/api/users$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("CreateUser");

    fn bind(_: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            email: require_string(input, "email", 1, Some(MAX_EMAIL_LEN))?,
            first_name: require_string(input, "firstName", 1, Some(MAX_SIZE_SMALL))?,
            last_name: require_string(input, "lastName", 1, Some(MAX_SIZE_SMALL))?,
        })
    }
}

impl RouteRequest for CreateUserRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("email", &self.email)
            .with("firstName", &self.first_name)
            .with("lastName", &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserRequest {
    pub user_id: i64,
}

impl RouteType for GetUserRequest {
    const NAME: &'static str = "GetUser";
    const PATTERN: &'static str = r"^/api/users/(?P<userID>\d+)$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("GetUser");

    fn bind(route: &RouteParams, _: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            user_id: require_route_int(route, "userID", 1)?,
        })
    }
}

impl RouteRequest for GetUserRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new().with("userID", self.user_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(GetUserResponse::from_reply(&reply))
    }
}

/// Partial profile update; only supplied fields are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditUserRequest {
    pub user_id: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RouteType for EditUserRequest {
    const NAME: &'static str = "EditUser";
    const PATTERN: &'static str = r"^/api/users/(?P<userID>\d+)$";
    const METHODS: &'static [&'static str] = &["PUT"];
    const COMMAND: Option<&'static str> = Some("EditUser");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        let user_id = require_route_int(route, "userID", 1)?;
        let email = optional_string(input, "email", 1, Some(MAX_EMAIL_LEN))?;
        let first_name = optional_string(input, "firstName", 1, Some(MAX_SIZE_SMALL))?;
        let last_name = optional_string(input, "lastName", 1, Some(MAX_SIZE_SMALL))?;

        if email.is_none() && first_name.is_none() && last_name.is_none() {
            return Err(ApiError::MissingParameter(
                "email, firstName, or lastName".to_string(),
            ));
        }

        Ok(Self {
            user_id,
            email,
            first_name,
            last_name,
        })
    }
}

impl RouteRequest for EditUserRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new().with("userID", self.user_id);
        params.insert_opt("email", self.email.as_deref());
        params.insert_opt("firstName", self.first_name.as_deref());
        params.insert_opt("lastName", self.last_name.as_deref());
        params
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(EditUserResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteUserRequest {
    pub user_id: i64,
}

impl RouteType for DeleteUserRequest {
    const NAME: &'static str = "DeleteUser";
    const PATTERN: &'static str = r"^/api/users/(?P<userID>\d+)$";
    const METHODS: &'static [&'static str] = &["DELETE"];
    const COMMAND: Option<&'static str> = Some("DeleteUser");

    fn bind(route: &RouteParams, _: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            user_id: require_route_int(route, "userID", 1)?,
        })
    }
}

impl RouteRequest for DeleteUserRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new().with("userID", self.user_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(DeleteUserResponse::from_reply(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(user_id: &str) -> RouteParams {
        RouteParams::from([("userID".to_string(), user_id.to_string())])
    }

    fn json_body(body: &str) -> RequestInput {
        RequestInput::from_http(None, Some("application/json"), body.as_bytes())
    }

    #[test]
    fn test_edit_user_requires_a_field() {
        let err = EditUserRequest::bind(&route("4"), &RequestInput::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required parameter: email, firstName, or lastName"
        );
    }

    #[test]
    fn test_edit_user_sends_only_supplied_fields() {
        let request = EditUserRequest::bind(&route("4"), &json_body(r#"{"lastName": "Byron"}"#)).unwrap();
        let params = request.to_command_params();
        assert_eq!(params.get("userID"), Some("4"));
        assert_eq!(params.get("lastName"), Some("Byron"));
        assert!(!params.contains("email"));
        assert!(!params.contains("firstName"));
    }

    #[test]
    fn test_edit_user_empty_field_is_invalid() {
        let err = EditUserRequest::bind(&route("4"), &json_body(r#"{"email": "  "}"#)).unwrap_err();
        assert_eq!(err, ApiError::InvalidParameter("email".into()));
    }

    #[test]
    fn test_user_id_route_bounds() {
        assert!(GetUserRequest::bind(&route("0"), &RequestInput::default()).is_err());
        assert_eq!(
            DeleteUserRequest::bind(&route("42"), &RequestInput::default()).unwrap().user_id,
            42
        );
    }

    #[test]
    fn test_create_user_email_length() {
        let long_email = format!("{}@example.com", "a".repeat(250));
        let body = format!(r#"{{"email": "{long_email}", "firstName": "Ada", "lastName": "L"}}"#);
        let err = CreateUserRequest::bind(&RouteParams::new(), &json_body(&body)).unwrap_err();
        assert_eq!(err, ApiError::InvalidParameter("email".into()));
    }
}
