//! Results and failures of a single conversation turn.

use serde::Serialize;
use thiserror::Error;

use crate::application::services::ConfirmationError;
use crate::domain::catalogue::{CatalogueError, ScoredItem};
use crate::domain::conversation::{ContextError, ConversationPhase, FunctionCallError};
use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::profile::ProfileError;
use crate::ports::AIError;

/// What a turn produced, as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Free-text assistant reply; the phase did not change.
    Reply { message: String },

    /// The model handed back a profile that was not confirmed. Its
    /// arguments were narrated back into the transcript.
    Unconfirmed {
        narration: String,
        reason: Option<String>,
    },

    /// Profile confirmed and products presented.
    Recommended {
        recommendation: String,
        products: Vec<ScoredItem>,
    },

    /// Profile confirmed but nothing in the catalogue qualified.
    NoMatch { message: String },

    /// Recommendations were already given; the user should restart.
    Reminder { message: String },

    /// Content was flagged. The conversation restarted with a new welcome.
    Reset { notice: String, welcome: String },
}

impl TurnOutcome {
    /// The text to show the user for this turn.
    pub fn message(&self) -> &str {
        match self {
            TurnOutcome::Reply { message }
            | TurnOutcome::NoMatch { message }
            | TurnOutcome::Reminder { message } => message,
            TurnOutcome::Unconfirmed { narration, .. } => narration,
            TurnOutcome::Recommended { recommendation, .. } => recommendation,
            TurnOutcome::Reset { notice, .. } => notice,
        }
    }
}

/// A turn failure. Any of these leaves the conversation unusable; callers
/// should discard it and start over.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurnError {
    #[error("language model call failed: {0}")]
    Upstream(#[from] AIError),

    #[error("model output was malformed: {0}")]
    MalformedModelOutput(String),

    #[error("catalogue unavailable: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error(transparent)]
    InvalidTransition(#[from] ContextError),
}

impl TurnError {
    /// A turn that began while a previous one was left mid-flight.
    pub fn interrupted(phase: ConversationPhase) -> Self {
        TurnError::InvalidTransition(ContextError::InvalidTransition(
            ValidationError::invalid_format(
                "phase",
                format!("previous turn stopped while {}", phase.label()),
            ),
        ))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TurnError::Upstream(AIError::RateLimited { .. }) => ErrorCode::RateLimited,
            TurnError::Upstream(_) => ErrorCode::AIProviderError,
            TurnError::MalformedModelOutput(_) => ErrorCode::MalformedModelOutput,
            TurnError::Catalogue(_) => ErrorCode::CatalogueError,
            TurnError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
        }
    }
}

impl From<ConfirmationError> for TurnError {
    fn from(err: ConfirmationError) -> Self {
        match err {
            ConfirmationError::Upstream(inner) => TurnError::Upstream(inner),
            ConfirmationError::UnparsableVerdict(_) => {
                TurnError::MalformedModelOutput(err.to_string())
            }
        }
    }
}

impl From<FunctionCallError> for TurnError {
    fn from(err: FunctionCallError) -> Self {
        TurnError::MalformedModelOutput(err.to_string())
    }
}

impl From<ProfileError> for TurnError {
    fn from(err: ProfileError) -> Self {
        TurnError::MalformedModelOutput(err.to_string())
    }
}
