//! Mock content moderator for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{AIError, ContentModerator};

/// Flags any text containing one of its configured terms
/// (case-insensitive) and records every text it was asked about.
#[derive(Debug, Clone, Default)]
pub struct MockModerator {
    terms: Vec<String>,
    failure: Option<AIError>,
    checked: Arc<Mutex<Vec<String>>>,
}

impl MockModerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flagging(mut self, term: impl Into<String>) -> Self {
        self.terms.push(term.into().to_lowercase());
        self
    }

    /// Every check fails with `error`.
    pub fn failing_with(mut self, error: AIError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ContentModerator for MockModerator {
    async fn is_flagged(&self, text: &str) -> Result<bool, AIError> {
        self.checked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let lowered = text.to_lowercase();
        Ok(self.terms.iter().any(|term| lowered.contains(term)))
    }
}
