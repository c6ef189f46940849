//! Chat, membership and chat message responses.

use serde::Serialize;
use serde_json::Value;

use crate::params::Payload;
use crate::responses::{decoded_list, optional_text, text, text_or};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChatsResponse {
    pub result_count: String,
    pub format: String,
    pub chats: Value,
}

impl ListChatsResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            result_count: text_or(reply, "resultCount", "0"),
            format: text(reply, "format"),
            chats: decoded_list(reply, "chats"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatResponse {
    #[serde(rename = "chatID")]
    pub chat_id: String,
    #[serde(rename = "createdByUserID")]
    pub created_by_user_id: String,
    pub title: String,
    pub created_at: String,
    pub result: String,
}

impl CreateChatResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            chat_id: text(reply, "chatID"),
            created_by_user_id: text(reply, "createdByUserID"),
            title: text(reply, "title"),
            created_at: text(reply, "createdAt"),
            result: text(reply, "result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetChatResponse {
    #[serde(rename = "chatID")]
    pub chat_id: String,
    #[serde(rename = "createdByUserID")]
    pub created_by_user_id: String,
    pub title: String,
    pub created_at: String,
    pub requester_role: String,
    pub member_count: String,
    pub owner_count: String,
}

impl GetChatResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            chat_id: text(reply, "chatID"),
            created_by_user_id: text(reply, "createdByUserID"),
            title: text(reply, "title"),
            created_at: text(reply, "createdAt"),
            requester_role: text(reply, "requesterRole"),
            member_count: text_or(reply, "memberCount", "0"),
            owner_count: text_or(reply, "ownerCount", "0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditChatResponse {
    #[serde(rename = "chatID")]
    pub chat_id: String,
    pub title: String,
    pub result: String,
}

impl EditChatResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            chat_id: text(reply, "chatID"),
            title: text(reply, "title"),
            result: text(reply, "result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteChatResponse {
    #[serde(rename = "chatID")]
    pub chat_id: String,
    pub result: String,
}

impl DeleteChatResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            chat_id: text(reply, "chatID"),
            result: text(reply, "result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChatMembersResponse {
    pub result_count: String,
    pub format: String,
    pub members: Value,
}

impl ListChatMembersResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            result_count: text_or(reply, "resultCount", "0"),
            format: text(reply, "format"),
            members: decoded_list(reply, "members"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChatMemberResponse {
    #[serde(rename = "chatID")]
    pub chat_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub role: String,
    pub joined_at: String,
    pub result: String,
}

impl AddChatMemberResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            chat_id: text(reply, "chatID"),
            user_id: text(reply, "userID"),
            role: text(reply, "role"),
            joined_at: text(reply, "joinedAt"),
            result: text(reply, "result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditChatMemberRoleResponse {
    #[serde(rename = "chatID")]
    pub chat_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub role: String,
    pub result: String,
}

impl EditChatMemberRoleResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            chat_id: text(reply, "chatID"),
            user_id: text(reply, "userID"),
            role: text(reply, "role"),
            result: text(reply, "result"),
        }
    }
}

/// One page of chat messages, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetChatMessagesResponse {
    pub result_count: String,
    pub format: String,
    pub messages: Value,
    /// Cursor for the next page; only sent when the backend supplied one.
    #[serde(rename = "nextBeforeMessageID", skip_serializing_if = "Option::is_none")]
    pub next_before_message_id: Option<String>,
}

impl GetChatMessagesResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            result_count: text_or(reply, "resultCount", "0"),
            format: text(reply, "format"),
            messages: decoded_list(reply, "messages"),
            next_before_message_id: optional_text(reply, "nextBeforeMessageID"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatMessageResponse {
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "chatID")]
    pub chat_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
    pub result: String,
}

impl CreateChatMessageResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            message_id: text(reply, "messageID"),
            chat_id: text(reply, "chatID"),
            user_id: text(reply, "userID"),
            body: text(reply, "body"),
            created_at: text(reply, "createdAt"),
            updated_at: text(reply, "updatedAt"),
            result: text(reply, "result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteChatMessageResponse {
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "chatID")]
    pub chat_id: String,
    pub result: String,
}

impl DeleteChatMessageResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            message_id: text(reply, "messageID"),
            chat_id: text(reply, "chatID"),
            result: text(reply, "result"),
        }
    }
}
