//! Moderation Gate - safety check applied to every message.
//!
//! Only free text is sent to the moderator; structured content (function
//! arguments, product lists) passes untouched. The gate does not retry:
//! moderator failures propagate to the caller.

use std::sync::Arc;
use tracing::warn;

use crate::domain::conversation::TurnContent;
use crate::ports::{AIError, ContentModerator};

/// Outcome of a moderation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationVerdict {
    Flagged,
    NotFlagged,
}

impl ModerationVerdict {
    pub fn is_flagged(self) -> bool {
        self == ModerationVerdict::Flagged
    }
}

#[derive(Clone)]
pub struct ModerationGate {
    moderator: Arc<dyn ContentModerator>,
}

impl ModerationGate {
    pub fn new(moderator: Arc<dyn ContentModerator>) -> Self {
        Self { moderator }
    }

    pub async fn check(&self, content: &TurnContent) -> Result<ModerationVerdict, AIError> {
        let Some(text) = content.as_text() else {
            return Ok(ModerationVerdict::NotFlagged);
        };

        if self.moderator.is_flagged(text).await? {
            warn!(chars = text.chars().count(), "Message flagged by moderation");
            Ok(ModerationVerdict::Flagged)
        } else {
            Ok(ModerationVerdict::NotFlagged)
        }
    }

    /// Shorthand for checking plain text.
    pub async fn check_text(&self, text: &str) -> Result<ModerationVerdict, AIError> {
        self.check(&TurnContent::Text(text.to_string())).await
    }
}
