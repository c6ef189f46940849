//! Error envelope for failed requests.
//!
//! # Responsibilities
//! - Map every [`ApiError`] to its status and `{"error": <message>}` body
//! - Add the sorted `allowed` list (and `Allow` header) to 405 responses
//! - Log internal fault details; clients only see the generic message
//!
//! Successful responses are plain JSON objects built from the route's
//! response model, so only failures need shaping here.

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;

/// JSON body for a failure.
pub fn error_body(err: &ApiError) -> Value {
    match err {
        ApiError::MethodNotAllowed { allowed } => json!({
            "error": err.to_string(),
            "allowed": allowed,
        }),
        _ => json!({ "error": err.to_string() }),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Internal error");
        }

        let mut response = (self.status(), Json(error_body(&self))).into_response();
        if let ApiError::MethodNotAllowed { allowed } = &self {
            if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}
