//! Request types for every endpoint, and the default registry.
//!
//! # Responsibilities
//! - One typed request per endpoint-operation pair
//! - Bind fields through the `params` primitives
//! - Convert fields to command parameters at the backend boundary only
//!
//! Registration order is precedence. Static-suffix routes that share a
//! prefix with an id-capturing route must come first.

pub mod chats;
pub mod messages;
pub mod polls;
pub mod system;
pub mod users;

use crate::routing::{Registry, RegistryError, RouteDescriptor};

/// The full route table in registration order.
pub fn default_registry() -> Result<Registry, RegistryError> {
    Registry::new(vec![
        RouteDescriptor::of::<system::StatusRequest>()?,
        RouteDescriptor::of::<system::HelloWorldRequest>()?,
        RouteDescriptor::of::<messages::GetMessagesRequest>()?,
        RouteDescriptor::of::<messages::CreateMessageRequest>()?,
        RouteDescriptor::of::<users::CreateUserRequest>()?,
        RouteDescriptor::of::<users::GetUserRequest>()?,
        RouteDescriptor::of::<users::EditUserRequest>()?,
        RouteDescriptor::of::<users::DeleteUserRequest>()?,
        RouteDescriptor::of::<chats::ListChatsRequest>()?,
        RouteDescriptor::of::<chats::CreateChatRequest>()?,
        RouteDescriptor::of::<chats::GetChatRequest>()?,
        RouteDescriptor::of::<chats::EditChatRequest>()?,
        RouteDescriptor::of::<chats::DeleteChatRequest>()?,
        RouteDescriptor::of::<chats::ListChatMembersRequest>()?,
        RouteDescriptor::of::<chats::AddChatMemberRequest>()?,
        RouteDescriptor::of::<chats::EditChatMemberRoleRequest>()?,
        RouteDescriptor::of::<chats::RemoveChatMemberRequest>()?,
        RouteDescriptor::of::<chats::GetChatMessagesRequest>()?,
        RouteDescriptor::of::<chats::CreateChatMessageRequest>()?,
        RouteDescriptor::of::<chats::EditChatMessageRequest>()?,
        RouteDescriptor::of::<chats::DeleteChatMessageRequest>()?,
        RouteDescriptor::of::<polls::ListPollsRequest>()?,
        RouteDescriptor::of::<polls::CreatePollRequest>()?,
        RouteDescriptor::of::<polls::GetPollsRequest>()?,
        RouteDescriptor::of::<polls::GetPollRequest>()?,
        RouteDescriptor::of::<polls::EditPollRequest>()?,
        RouteDescriptor::of::<polls::DeletePollRequest>()?,
        RouteDescriptor::of::<polls::GetPollParticipationRequest>()?,
        RouteDescriptor::of::<polls::SubmitVoteRequest>()?,
        RouteDescriptor::of::<polls::SubmitPollVotesRequest>()?,
        RouteDescriptor::of::<polls::DeletePollVotesRequest>()?,
        RouteDescriptor::of::<polls::SubmitPollTextResponseRequest>()?,
    ])
}
