//! Poll responses.

use serde::Serialize;

use crate::params::Payload;
use crate::responses::{optional_text, text, DecodedResponse};

/// Poll list with `polls` decoded. Shared by the global and per-chat listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PollListResponse(DecodedResponse);

impl PollListResponse {
    pub fn from_reply(reply: Payload) -> Self {
        Self(DecodedResponse::new(reply, &["polls"]))
    }
}

/// Single poll with `options` and `responses` decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GetPollResponse(DecodedResponse);

impl GetPollResponse {
    pub fn from_reply(reply: Payload) -> Self {
        Self(DecodedResponse::new(reply, &["options", "responses"]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPollResponse {
    #[serde(rename = "pollID")]
    pub poll_id: String,
    pub created_by: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_count: Option<String>,
}

impl EditPollResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            poll_id: text(reply, "pollID"),
            created_by: text(reply, "createdBy"),
            result: text(reply, "result"),
            option_count: optional_text(reply, "optionCount"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletePollResponse {
    #[serde(rename = "pollID")]
    pub poll_id: String,
    pub result: String,
}

impl DeletePollResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            poll_id: text(reply, "pollID"),
            result: text(reply, "result"),
        }
    }
}

/// Participation breakdown with the three user-id lists decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GetPollParticipationResponse(DecodedResponse);

impl GetPollParticipationResponse {
    pub fn from_reply(reply: Payload) -> Self {
        Self(DecodedResponse::new(
            reply,
            &["eligibleUserIDs", "votedUserIDs", "notVotedUserIDs"],
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteResponse {
    #[serde(rename = "voteID")]
    pub vote_id: String,
    #[serde(rename = "pollID")]
    pub poll_id: String,
    #[serde(rename = "optionID")]
    pub option_id: String,
    pub created_at: String,
}

impl SubmitVoteResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            vote_id: text(reply, "voteID"),
            poll_id: text(reply, "pollID"),
            option_id: text(reply, "optionID"),
            created_at: text(reply, "createdAt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubmitPollVotesResponse(DecodedResponse);

impl SubmitPollVotesResponse {
    pub fn from_reply(reply: Payload) -> Self {
        Self(DecodedResponse::new(reply, &["optionIDs"]))
    }
}
