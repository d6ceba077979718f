//! Phases of a laptop-advice conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a conversation is in its elicitation and recommendation protocol.
///
/// `Confirming` and `Recommending` only exist inside a single turn; a
/// conversation at rest is either `Eliciting` or `Discussing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// Asking questions until the model hands back a profile.
    #[default]
    Eliciting,
    /// Checking a candidate profile.
    Confirming,
    /// Scoring the catalogue and presenting matches.
    Recommending,
    /// Follow-up questions about the presented products.
    Discussing,
}

impl ConversationPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eliciting => "Eliciting",
            Self::Confirming => "Confirming",
            Self::Recommending => "Recommending",
            Self::Discussing => "Discussing",
        }
    }

    /// True for phases that only exist mid-turn.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Confirming | Self::Recommending)
    }
}

impl StateMachine for ConversationPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationPhase::*;
        matches!(
            (self, target),
            (Eliciting, Confirming)
                | (Confirming, Eliciting)
                | (Confirming, Recommending)
                | (Recommending, Discussing)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationPhase::*;
        match self {
            Eliciting => vec![Confirming],
            Confirming => vec![Eliciting, Recommending],
            Recommending => vec![Discussing],
            // only a restart leaves Discussing
            Discussing => vec![],
        }
    }
}
