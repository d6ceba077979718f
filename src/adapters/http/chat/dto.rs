//! Request and response bodies for the chat endpoints.

use serde::{Deserialize, Serialize};

use crate::application::TurnOutcome;
use crate::domain::catalogue::ScoredItem;
use crate::domain::conversation::{ChatLog, ConversationContext, ConversationPhase};
use crate::domain::profile::RequirementProfile;

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Snapshot of a session as the chat page renders it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub phase: ConversationPhase,
    pub profile: Option<RequirementProfile>,
    pub products: Option<Vec<ScoredItem>>,
    pub chat_log: ChatLog,
}

impl From<&ConversationContext> for SessionResponse {
    fn from(ctx: &ConversationContext) -> Self {
        Self {
            session_id: ctx.session_id().to_string(),
            phase: ctx.phase(),
            profile: ctx.profile().cloned(),
            products: ctx.presented().map(<[ScoredItem]>::to_vec),
            chat_log: ctx.chat_log().clone(),
        }
    }
}

/// A session opened or restarted, with its welcome message.
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeResponse {
    pub session_id: String,
    pub welcome: String,
    pub chat_log: ChatLog,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub session_id: String,
    pub phase: ConversationPhase,
    pub outcome: TurnOutcome,
    pub chat_log: ChatLog,
}

impl TurnResponse {
    pub fn new(ctx: &ConversationContext, outcome: TurnOutcome) -> Self {
        Self {
            session_id: ctx.session_id().to_string(),
            phase: ctx.phase(),
            outcome,
            chat_log: ctx.chat_log().clone(),
        }
    }
}
