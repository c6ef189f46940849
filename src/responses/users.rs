//! User responses.

use serde::Serialize;

use crate::params::Payload;
use crate::responses::text;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserResponse {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub created_at: String,
}

impl GetUserResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            user_id: text(reply, "userID"),
            email: text(reply, "email"),
            first_name: text(reply, "firstName"),
            last_name: text(reply, "lastName"),
            display_name: text(reply, "displayName"),
            created_at: text(reply, "createdAt"),
        }
    }
}

/// The updated user plus the backend's result marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditUserResponse {
    #[serde(flatten)]
    pub user: GetUserResponse,
    pub result: String,
}

impl EditUserResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            user: GetUserResponse::from_reply(reply),
            result: text(reply, "result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteUserResponse {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub result: String,
}

impl DeleteUserResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            user_id: text(reply, "userID"),
            result: text(reply, "result"),
        }
    }
}
