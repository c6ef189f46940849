//! Client-facing failure taxonomy.
//!
//! Every failure that can end a request (validation, routing, backend,
//! transport, internal) is an [`ApiError`]. Each variant knows its HTTP
//! status; the wire envelope is produced in `http::response`.

use axum::http::StatusCode;
use thiserror::Error;

/// A request failure carrying a human-readable message and an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A required query/body parameter was absent or empty.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A query/body parameter was malformed or out of bounds.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A named route capture was absent.
    #[error("Missing required route parameter: {0}")]
    MissingRouteParameter(String),

    /// A named route capture was malformed or out of bounds.
    #[error("Invalid route parameter: {0}")]
    InvalidRouteParameter(String),

    /// Any other client input problem, with a request-specific message.
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeded the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// No registered route matches the path.
    #[error("Endpoint not found")]
    NotFound,

    /// The path is registered, but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed {
        /// Sorted, de-duplicated union of methods accepted on the path.
        allowed: Vec<String>,
    },

    /// The backend reported a failure. `status` is always within 400..=599.
    #[error("{message}")]
    Backend { status: StatusCode, message: String },

    /// The backend could not be reached or the call faulted.
    #[error("Error connecting to backend")]
    Transport,

    /// Unexpected fault. The detail is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_)
            | Self::InvalidParameter(_)
            | Self::MissingRouteParameter(_)
            | Self::InvalidRouteParameter(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Backend { status, .. } => *status,
            Self::Transport => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures caused by client input, detected before any backend call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_)
                | Self::InvalidParameter(_)
                | Self::MissingRouteParameter(_)
                | Self::InvalidRouteParameter(_)
                | Self::BadRequest(_)
        )
    }

    pub(crate) fn missing(key: &str) -> Self {
        Self::MissingParameter(key.to_string())
    }

    pub(crate) fn invalid(key: &str) -> Self {
        Self::InvalidParameter(key.to_string())
    }
}

/// Result alias for request handling.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ApiError::missing("question").to_string(),
            "Missing required parameter: question"
        );
        assert_eq!(
            ApiError::invalid("limit").to_string(),
            "Invalid parameter: limit"
        );
        assert_eq!(
            ApiError::InvalidRouteParameter("pollID".into()).to_string(),
            "Invalid route parameter: pollID"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::missing("a").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed { allowed: vec!["GET".into()] }.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::Transport.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_displayed() {
        let err = ApiError::Internal("secret stack trace".into());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
