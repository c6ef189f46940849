//! Chat, membership and chat message requests.

use std::fmt;

use crate::backend::CommandParams;
use crate::error::{ApiError, ApiResult};
use crate::params::extract::{optional_string, require_int, require_route_int, require_string, strict_int};
use crate::params::{Payload, RequestInput, RouteParams, MAX_SIZE_QUERY, MAX_SIZE_SMALL};
use crate::responses::chats::{
    AddChatMemberResponse, CreateChatMessageResponse, CreateChatResponse, DeleteChatMessageResponse,
    DeleteChatResponse, EditChatMemberRoleResponse, EditChatResponse, GetChatMessagesResponse,
    GetChatResponse, ListChatMembersResponse, ListChatsResponse,
};
use crate::responses::BoxedResponse;
use crate::routing::{RouteRequest, RouteType};

/// Membership role within a chat. Matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    Owner,
    Member,
}

impl ChatRole {
    pub fn parse(value: &str) -> ApiResult<Self> {
        match value {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            _ => Err(ApiError::invalid("role")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn require_id(input: &RequestInput, key: &str) -> ApiResult<i64> {
    require_int(input, key, Some(1), None)
}

/// One page of the user's chats, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChatsRequest {
    pub user_id: i64,
    pub limit: Option<i64>,
    pub before_chat_id: Option<i64>,
}

impl RouteType for ListChatsRequest {
    const NAME: &'static str = "ListChats";
    const PATTERN: &'static str = r"^/api/chats$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("ListChats");

    fn bind(_: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            user_id: require_id(input, "userID")?,
            limit: strict_int(input, "limit", Some(1), Some(100))?,
            before_chat_id: strict_int(input, "beforeChatID", Some(1), None)?,
        })
    }
}

impl RouteRequest for ListChatsRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new().with("userID", self.user_id);
        params.insert_opt("limit", self.limit);
        params.insert_opt("beforeChatID", self.before_chat_id);
        params
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(ListChatsResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChatRequest {
    pub creator_user_id: i64,
    pub title: String,
}

impl RouteType for CreateChatRequest {
    const NAME: &'static str = "CreateChat";
    const PATTERN: &'static str = r"^/api/chats$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("CreateChat");

    fn bind(_: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            creator_user_id: require_id(input, "creatorUserID")?,
            title: require_string(input, "title", 1, Some(MAX_SIZE_SMALL))?,
        })
    }
}

impl RouteRequest for CreateChatRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("creatorUserID", self.creator_user_id)
            .with("title", &self.title)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(CreateChatResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetChatRequest {
    pub chat_id: i64,
    pub user_id: i64,
}

impl RouteType for GetChatRequest {
    const NAME: &'static str = "GetChat";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("GetChat");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            user_id: require_id(input, "userID")?,
        })
    }
}

impl RouteRequest for GetChatRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("userID", self.user_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(GetChatResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditChatRequest {
    pub chat_id: i64,
    pub user_id: i64,
    pub title: String,
}

impl RouteType for EditChatRequest {
    const NAME: &'static str = "EditChat";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)$";
    const METHODS: &'static [&'static str] = &["PUT"];
    const COMMAND: Option<&'static str> = Some("EditChat");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            user_id: require_id(input, "userID")?,
            title: require_string(input, "title", 1, Some(MAX_SIZE_SMALL))?,
        })
    }
}

impl RouteRequest for EditChatRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("userID", self.user_id)
            .with("title", &self.title)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(EditChatResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteChatRequest {
    pub chat_id: i64,
    pub user_id: i64,
}

impl RouteType for DeleteChatRequest {
    const NAME: &'static str = "DeleteChat";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)$";
    const METHODS: &'static [&'static str] = &["DELETE"];
    const COMMAND: Option<&'static str> = Some("DeleteChat");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            user_id: require_id(input, "userID")?,
        })
    }
}

impl RouteRequest for DeleteChatRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("userID", self.user_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(DeleteChatResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChatMembersRequest {
    pub chat_id: i64,
    pub user_id: i64,
}

impl RouteType for ListChatMembersRequest {
    const NAME: &'static str = "ListChatMembers";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/members$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("ListChatMembers");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            user_id: require_id(input, "userID")?,
        })
    }
}

impl RouteRequest for ListChatMembersRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("userID", self.user_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(ListChatMembersResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddChatMemberRequest {
    pub chat_id: i64,
    pub acting_user_id: i64,
    pub user_id: i64,
    /// Backend default applies when absent.
    pub role: Option<ChatRole>,
}

impl RouteType for AddChatMemberRequest {
    const NAME: &'static str = "AddChatMember";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/members$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("AddChatMember");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        let role = optional_string(input, "role", 1, Some(MAX_SIZE_SMALL))?
            .map(|role| ChatRole::parse(&role))
            .transpose()?;

        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            acting_user_id: require_id(input, "actingUserID")?,
            user_id: require_id(input, "userID")?,
            role,
        })
    }
}

impl RouteRequest for AddChatMemberRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new()
            .with("chatID", self.chat_id)
            .with("actingUserID", self.acting_user_id)
            .with("userID", self.user_id);
        params.insert_opt("role", self.role);
        params
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(AddChatMemberResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditChatMemberRoleRequest {
    pub chat_id: i64,
    pub acting_user_id: i64,
    pub user_id: i64,
    pub role: ChatRole,
}

impl RouteType for EditChatMemberRoleRequest {
    const NAME: &'static str = "EditChatMemberRole";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/members/(?P<userID>\d+)$";
    const METHODS: &'static [&'static str] = &["PUT"];
    const COMMAND: Option<&'static str> = Some("EditChatMemberRole");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            acting_user_id: require_id(input, "actingUserID")?,
            user_id: require_route_int(route, "userID", 1)?,
            role: ChatRole::parse(&require_string(input, "role", 1, Some(MAX_SIZE_SMALL))?)?,
        })
    }
}

impl RouteRequest for EditChatMemberRoleRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("actingUserID", self.acting_user_id)
            .with("userID", self.user_id)
            .with("role", self.role)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(EditChatMemberRoleResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveChatMemberRequest {
    pub chat_id: i64,
    pub acting_user_id: i64,
    pub user_id: i64,
}

impl RouteType for RemoveChatMemberRequest {
    const NAME: &'static str = "RemoveChatMember";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/members/(?P<userID>\d+)$";
    const METHODS: &'static [&'static str] = &["DELETE"];
    const COMMAND: Option<&'static str> = Some("RemoveChatMember");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            acting_user_id: require_id(input, "actingUserID")?,
            user_id: require_route_int(route, "userID", 1)?,
        })
    }
}

impl RouteRequest for RemoveChatMemberRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("actingUserID", self.acting_user_id)
            .with("userID", self.user_id)
    }
}

/// One page of a chat's messages, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetChatMessagesRequest {
    pub chat_id: i64,
    pub user_id: i64,
    pub limit: Option<i64>,
    pub before_message_id: Option<i64>,
}

impl RouteType for GetChatMessagesRequest {
    const NAME: &'static str = "GetChatMessages";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/messages$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("GetChatMessages");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            user_id: require_id(input, "userID")?,
            limit: strict_int(input, "limit", Some(1), Some(100))?,
            before_message_id: strict_int(input, "beforeMessageID", Some(1), None)?,
        })
    }
}

impl RouteRequest for GetChatMessagesRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new()
            .with("chatID", self.chat_id)
            .with("userID", self.user_id);
        params.insert_opt("limit", self.limit);
        params.insert_opt("beforeMessageID", self.before_message_id);
        params
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(GetChatMessagesResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChatMessageRequest {
    pub chat_id: i64,
    pub user_id: i64,
    pub body: String,
}

impl RouteType for CreateChatMessageRequest {
    const NAME: &'static str = "CreateChatMessage";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/messages$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("CreateChatMessage");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            user_id: require_id(input, "userID")?,
            body: require_string(input, "body", 1, Some(MAX_SIZE_QUERY))?,
        })
    }
}

impl RouteRequest for CreateChatMessageRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("userID", self.user_id)
            .with("body", &self.body)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(CreateChatMessageResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditChatMessageRequest {
    pub chat_id: i64,
    pub message_id: i64,
    pub user_id: i64,
    pub body: String,
}

impl RouteType for EditChatMessageRequest {
    const NAME: &'static str = "EditChatMessage";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/messages/(?P<messageID>\d+)$";
    const METHODS: &'static [&'static str] = &["PUT"];
    const COMMAND: Option<&'static str> = Some("EditChatMessage");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            message_id: require_route_int(route, "messageID", 1)?,
            user_id: require_id(input, "userID")?,
            body: require_string(input, "body", 1, Some(MAX_SIZE_QUERY))?,
        })
    }
}

impl RouteRequest for EditChatMessageRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("messageID", self.message_id)
            .with("userID", self.user_id)
            .with("body", &self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteChatMessageRequest {
    pub chat_id: i64,
    pub message_id: i64,
    pub user_id: i64,
}

impl RouteType for DeleteChatMessageRequest {
    const NAME: &'static str = "DeleteChatMessage";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/messages/(?P<messageID>\d+)$";
    const METHODS: &'static [&'static str] = &["DELETE"];
    const COMMAND: Option<&'static str> = Some("DeleteChatMessage");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            message_id: require_route_int(route, "messageID", 1)?,
            user_id: require_id(input, "userID")?,
        })
    }
}

impl RouteRequest for DeleteChatMessageRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("messageID", self.message_id)
            .with("userID", self.user_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(DeleteChatMessageResponse::from_reply(&reply))
    }
}
