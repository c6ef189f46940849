//! Global message board responses.

use serde::Serialize;

use crate::params::Payload;
use crate::responses::{text, DecodedResponse};

/// Message list with `messages` decoded from JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GetMessagesResponse(DecodedResponse);

impl GetMessagesResponse {
    pub fn from_reply(reply: Payload) -> Self {
        Self(DecodedResponse::new(reply, &["messages"]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageResponse {
    pub result: String,
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
    pub message: String,
    pub created_at: String,
}

impl CreateMessageResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            result: text(reply, "result"),
            message_id: text(reply, "messageID"),
            user_id: text(reply, "userID"),
            name: text(reply, "name"),
            message: text(reply, "message"),
            created_at: text(reply, "createdAt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::RouteResponse;
    use serde_json::json;

    #[test]
    fn test_get_messages_keeps_other_keys() {
        let reply = json!({
            "messages": r#"[{"messageID":"1","message":"hi"}]"#,
            "resultCount": "1",
        });
        let wire = GetMessagesResponse::from_reply(reply.as_object().unwrap().clone()).to_wire();
        assert_eq!(
            wire,
            json!({"messages": [{"messageID": "1", "message": "hi"}], "resultCount": "1"})
        );
    }

    #[test]
    fn test_create_message_fills_all_fields() {
        let reply = json!({"messageID": 12, "result": "created"});
        let wire = CreateMessageResponse::from_reply(reply.as_object().unwrap()).to_wire();
        assert_eq!(wire["messageID"], "12");
        assert_eq!(wire.as_object().unwrap().len(), 6);
        assert_eq!(wire["createdAt"], "");
    }
}
