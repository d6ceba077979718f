//! Per-session conversation state.

use thiserror::Error;

use super::chat_log::ChatLog;
use super::phase::ConversationPhase;
use super::transcript::Transcript;
use crate::domain::catalogue::ScoredItem;
use crate::domain::foundation::{SessionId, StateMachine, Timestamp, ValidationError};
use crate::domain::profile::RequirementProfile;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    #[error("a requirement profile has already been confirmed for this conversation")]
    ProfileAlreadyConfirmed,

    #[error(transparent)]
    InvalidTransition(#[from] ValidationError),
}

/// Everything one conversation owns: its phase, transcripts, confirmed
/// profile and the products presented to the user.
///
/// Each session gets its own context; nothing here is shared between
/// sessions.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    session_id: SessionId,
    phase: ConversationPhase,
    profile: Option<RequirementProfile>,
    primary: Transcript,
    recommendation: Option<Transcript>,
    presented: Option<Vec<ScoredItem>>,
    chat_log: ChatLog,
    started_at: Timestamp,
}

impl ConversationContext {
    pub fn new(session_id: SessionId, system_prompt: impl Into<String>) -> Self {
        Self {
            session_id,
            phase: ConversationPhase::Eliciting,
            profile: None,
            primary: Transcript::with_system_prompt(system_prompt),
            recommendation: None,
            presented: None,
            chat_log: ChatLog::default(),
            started_at: Timestamp::now(),
        }
    }

    /// Discards all conversation state, keeping only the session id.
    pub fn restart(&mut self, system_prompt: impl Into<String>) {
        *self = Self::new(self.session_id, system_prompt);
    }

    /// Records the assistant's opening message.
    pub fn record_welcome(&mut self, welcome: impl Into<String>) {
        let welcome = welcome.into();
        self.primary.push_assistant(welcome.clone());
        self.chat_log.push_bot(welcome);
    }

    pub fn advance_to(&mut self, target: ConversationPhase) -> Result<(), ContextError> {
        self.phase = self.phase.transition_to(target)?;
        Ok(())
    }

    /// Stores the confirmed profile. A conversation confirms at most once.
    pub fn confirm_profile(&mut self, profile: RequirementProfile) -> Result<(), ContextError> {
        if self.profile.is_some() {
            return Err(ContextError::ProfileAlreadyConfirmed);
        }
        self.profile = Some(profile);
        Ok(())
    }

    /// Records the products shown to the user and, when there are any,
    /// the transcript used to discuss them.
    pub fn present(&mut self, products: Vec<ScoredItem>, discussion: Option<Transcript>) {
        self.presented = Some(products);
        self.recommendation = discussion;
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn profile(&self) -> Option<&RequirementProfile> {
        self.profile.as_ref()
    }

    pub fn primary(&self) -> &Transcript {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut Transcript {
        &mut self.primary
    }

    pub fn recommendation(&self) -> Option<&Transcript> {
        self.recommendation.as_ref()
    }

    pub fn recommendation_mut(&mut self) -> Option<&mut Transcript> {
        self.recommendation.as_mut()
    }

    /// Products presented so far; `Some(empty)` when nothing matched.
    pub fn presented(&self) -> Option<&[ScoredItem]> {
        self.presented.as_deref()
    }

    pub fn chat_log(&self) -> &ChatLog {
        &self.chat_log
    }

    pub fn chat_log_mut(&mut self) -> &mut ChatLog {
        &mut self.chat_log
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }
}
