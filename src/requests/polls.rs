//! Poll requests: listing, lifecycle, voting and free-text responses.
//!
//! Poll options travel to the backend as compact JSON text. Option
//! uniqueness is left to the backend; only array shape and size are checked
//! here.

use serde_json::Value;

use crate::backend::CommandParams;
use crate::error::{ApiError, ApiResult};
use crate::params::extract::{
    encode_json_array, nullable_int, optional_bool, optional_int, optional_json_array,
    optional_string, require_int, require_json_array, require_route_int, require_string, strict_int,
};
use crate::params::{Patch, Payload, RequestInput, RouteParams, MAX_SIZE_QUERY, MAX_SIZE_SMALL};
use crate::responses::polls::{
    DeletePollResponse, EditPollResponse, GetPollParticipationResponse, GetPollResponse,
    PollListResponse, SubmitPollVotesResponse, SubmitVoteResponse,
};
use crate::responses::BoxedResponse;
use crate::routing::{RouteRequest, RouteType};

/// Most options a poll may carry.
pub const MAX_POLL_OPTIONS: usize = 20;

/// Poll type that collects text answers instead of option votes.
pub const FREE_TEXT_TYPE: &str = "free_text";

const MAX_POLL_TYPE_LEN: usize = 64;
const MAX_POLL_STATUS_LEN: usize = 64;

fn require_id(input: &RequestInput, key: &str) -> ApiResult<i64> {
    require_int(input, key, Some(1), None)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPollsRequest {
    pub chat_id: i64,
    pub requester_user_id: i64,
    pub include_closed: bool,
}

impl RouteType for ListPollsRequest {
    const NAME: &'static str = "ListPolls";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/polls$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("ListPolls");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            chat_id: require_route_int(route, "chatID", 1)?,
            requester_user_id: require_id(input, "requesterUserID")?,
            include_closed: optional_bool(input, "includeClosed")?.unwrap_or(true),
        })
    }
}

impl RouteRequest for ListPollsRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("chatID", self.chat_id)
            .with("requesterUserID", self.requester_user_id)
            .with("includeClosed", self.include_closed)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(PollListResponse::from_reply(reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePollRequest {
    pub chat_id: i64,
    pub creator_user_id: i64,
    pub question: String,
    pub poll_type: String,
    pub allow_change_vote: bool,
    pub is_anonymous: bool,
    pub expires_at: Option<i64>,
    /// Encoded options; `None` for free-text polls.
    pub options_json: Option<String>,
}

impl RouteType for CreatePollRequest {
    const NAME: &'static str = "CreatePoll";
    const PATTERN: &'static str = r"^/api/chats/(?P<chatID>\d+)/polls$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("CreatePoll");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        let chat_id = require_route_int(route, "chatID", 1)?;
        let creator_user_id = require_id(input, "creatorUserID")?;
        let question = require_string(input, "question", 1, Some(MAX_SIZE_SMALL))?;
        let poll_type = require_string(input, "type", 1, Some(MAX_POLL_TYPE_LEN))?;
        let allow_change_vote = optional_bool(input, "allowChangeVote")?.unwrap_or(false);
        let is_anonymous = optional_bool(input, "isAnonymous")?.unwrap_or(false);
        let expires_at = optional_int(input, "expiresAt", Some(1), None)?;

        let options_json = if poll_type.eq_ignore_ascii_case(FREE_TEXT_TYPE) {
            let options = optional_json_array(input, "options", Some(0), Some(MAX_POLL_OPTIONS))?;
            if options.is_some_and(|items| !items.is_empty()) {
                return Err(ApiError::invalid("options"));
            }
            None
        } else {
            let options = require_json_array(input, "options", Some(2), Some(MAX_POLL_OPTIONS))?;
            Some(encode_json_array(&options, "options")?)
        };

        Ok(Self {
            chat_id,
            creator_user_id,
            question,
            poll_type,
            allow_change_vote,
            is_anonymous,
            expires_at,
            options_json,
        })
    }
}

impl RouteRequest for CreatePollRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new()
            .with("chatID", self.chat_id)
            .with("creatorUserID", self.creator_user_id)
            .with("question", &self.question)
            .with("type", &self.poll_type)
            .with("allowChangeVote", self.allow_change_vote)
            .with("isAnonymous", self.is_anonymous);
        params.insert_opt("expiresAt", self.expires_at);
        params.insert_opt("options", self.options_json.as_deref());
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPollsRequest {
    pub limit: Option<i64>,
}

impl RouteType for GetPollsRequest {
    const NAME: &'static str = "GetPolls";
    const PATTERN: &'static str = r"^/api/polls$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("GetPolls");

    fn bind(_: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            limit: strict_int(input, "limit", Some(1), Some(100))?,
        })
    }
}

impl RouteRequest for GetPollsRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new();
        params.insert_opt("limit", self.limit);
        params
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(PollListResponse::from_reply(reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPollRequest {
    pub poll_id: i64,
}

impl RouteType for GetPollRequest {
    const NAME: &'static str = "GetPoll";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("GetPoll");

    fn bind(route: &RouteParams, _: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            poll_id: require_route_int(route, "pollID", 1)?,
        })
    }
}

impl RouteRequest for GetPollRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new().with("pollID", self.poll_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(GetPollResponse::from_reply(reply))
    }
}

/// Partial poll update. Fields left `None`/`Unchanged` are not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPollRequest {
    pub poll_id: i64,
    pub actor_user_id: i64,
    pub question: Option<String>,
    pub allow_change_vote: Option<bool>,
    pub is_anonymous: Option<bool>,
    pub status: Option<String>,
    pub expires_at: Patch<i64>,
    pub options_json: Option<String>,
}

impl EditPollRequest {
    fn edits_nothing(&self) -> bool {
        self.question.is_none()
            && self.allow_change_vote.is_none()
            && self.is_anonymous.is_none()
            && self.status.is_none()
            && self.expires_at.is_unchanged()
            && self.options_json.is_none()
    }
}

impl RouteType for EditPollRequest {
    const NAME: &'static str = "EditPoll";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)$";
    const METHODS: &'static [&'static str] = &["PUT"];
    const COMMAND: Option<&'static str> = Some("EditPoll");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        let options_json = optional_json_array(input, "options", Some(0), Some(MAX_POLL_OPTIONS))?
            .map(|options: Vec<Value>| encode_json_array(&options, "options"))
            .transpose()?;

        let request = Self {
            poll_id: require_route_int(route, "pollID", 1)?,
            actor_user_id: require_id(input, "actorUserID")?,
            question: optional_string(input, "question", 1, Some(MAX_SIZE_SMALL))?,
            allow_change_vote: optional_bool(input, "allowChangeVote")?,
            is_anonymous: optional_bool(input, "isAnonymous")?,
            status: optional_string(input, "status", 1, Some(MAX_POLL_STATUS_LEN))?,
            expires_at: nullable_int(input, "expiresAt", Some(1))?,
            options_json,
        };

        if request.edits_nothing() {
            return Err(ApiError::MissingParameter(
                "at least one editable field".to_string(),
            ));
        }
        Ok(request)
    }
}

impl RouteRequest for EditPollRequest {
    fn to_command_params(&self) -> CommandParams {
        let mut params = CommandParams::new()
            .with("pollID", self.poll_id)
            .with("actorUserID", self.actor_user_id);
        params.insert_opt("question", self.question.as_deref());
        params.insert_opt("allowChangeVote", self.allow_change_vote);
        params.insert_opt("isAnonymous", self.is_anonymous);
        params.insert_opt("status", self.status.as_deref());
        match self.expires_at {
            Patch::Unchanged => {}
            // The backend reads the literal `null` as "clear the expiry".
            Patch::Clear => params.insert("expiresAt", "null"),
            Patch::Set(expires_at) => params.insert("expiresAt", expires_at),
        }
        params.insert_opt("options", self.options_json.as_deref());
        params
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(EditPollResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePollRequest {
    pub poll_id: i64,
}

impl RouteType for DeletePollRequest {
    const NAME: &'static str = "DeletePoll";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)$";
    const METHODS: &'static [&'static str] = &["DELETE"];
    const COMMAND: Option<&'static str> = Some("DeletePoll");

    fn bind(route: &RouteParams, _: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            poll_id: require_route_int(route, "pollID", 1)?,
        })
    }
}

impl RouteRequest for DeletePollRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new().with("pollID", self.poll_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(DeletePollResponse::from_reply(&reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPollParticipationRequest {
    pub poll_id: i64,
    pub requester_user_id: i64,
}

impl RouteType for GetPollParticipationRequest {
    const NAME: &'static str = "GetPollParticipation";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)/participation$";
    const METHODS: &'static [&'static str] = &["GET"];
    const COMMAND: Option<&'static str> = Some("GetPollParticipation");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            poll_id: require_route_int(route, "pollID", 1)?,
            requester_user_id: require_id(input, "requesterUserID")?,
        })
    }
}

impl RouteRequest for GetPollParticipationRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("pollID", self.poll_id)
            .with("requesterUserID", self.requester_user_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(GetPollParticipationResponse::from_reply(reply))
    }
}

/// Single-option vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitVoteRequest {
    pub poll_id: i64,
    pub option_id: i64,
}

impl RouteType for SubmitVoteRequest {
    const NAME: &'static str = "SubmitVote";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)/vote$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("SubmitVote");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            poll_id: require_route_int(route, "pollID", 1)?,
            option_id: require_id(input, "optionID")?,
        })
    }
}

impl RouteRequest for SubmitVoteRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("pollID", self.poll_id)
            .with("optionID", self.option_id)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(SubmitVoteResponse::from_reply(&reply))
    }
}

/// One user's full ballot, replacing any earlier votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPollVotesRequest {
    pub poll_id: i64,
    pub user_id: i64,
    pub option_ids_json: String,
}

impl RouteType for SubmitPollVotesRequest {
    const NAME: &'static str = "SubmitPollVotes";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)/votes$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("SubmitPollVotes");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        let option_ids = require_json_array(input, "optionIDs", Some(1), Some(MAX_POLL_OPTIONS))?;
        Ok(Self {
            poll_id: require_route_int(route, "pollID", 1)?,
            user_id: require_id(input, "userID")?,
            option_ids_json: encode_json_array(&option_ids, "optionIDs")?,
        })
    }
}

impl RouteRequest for SubmitPollVotesRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("pollID", self.poll_id)
            .with("userID", self.user_id)
            .with("optionIDs", &self.option_ids_json)
    }

    fn transform_response(&self, reply: Payload) -> BoxedResponse {
        Box::new(SubmitPollVotesResponse::from_reply(reply))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePollVotesRequest {
    pub poll_id: i64,
    pub user_id: i64,
}

impl RouteType for DeletePollVotesRequest {
    const NAME: &'static str = "DeletePollVotes";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)/votes$";
    const METHODS: &'static [&'static str] = &["DELETE"];
    const COMMAND: Option<&'static str> = Some("DeletePollVotes");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            poll_id: require_route_int(route, "pollID", 1)?,
            user_id: require_id(input, "userID")?,
        })
    }
}

impl RouteRequest for DeletePollVotesRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("pollID", self.poll_id)
            .with("userID", self.user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPollTextResponseRequest {
    pub poll_id: i64,
    pub user_id: i64,
    pub text_value: String,
}

impl RouteType for SubmitPollTextResponseRequest {
    const NAME: &'static str = "SubmitPollTextResponse";
    const PATTERN: &'static str = r"^/api/polls/(?P<pollID>\d+)/responses$";
    const METHODS: &'static [&'static str] = &["POST"];
    const COMMAND: Option<&'static str> = Some("SubmitPollTextResponse");

    fn bind(route: &RouteParams, input: &RequestInput) -> ApiResult<Self> {
        Ok(Self {
            poll_id: require_route_int(route, "pollID", 1)?,
            user_id: require_id(input, "userID")?,
            text_value: require_string(input, "textValue", 1, Some(MAX_SIZE_QUERY))?,
        })
    }
}

impl RouteRequest for SubmitPollTextResponseRequest {
    fn to_command_params(&self) -> CommandParams {
        CommandParams::new()
            .with("pollID", self.poll_id)
            .with("userID", self.user_id)
            .with("textValue", &self.text_value)
    }
}
