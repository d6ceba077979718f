//! The user-visible record of a conversation.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub text: String,
    pub at: Timestamp,
}

/// What the user has seen, as opposed to what the model has been sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Speaker::User, text.into());
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.push(Speaker::Bot, text.into());
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn last_bot_message(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.speaker == Speaker::Bot)
            .map(|entry| entry.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.entries.push(ChatEntry {
            speaker,
            text,
            at: Timestamp::now(),
        });
    }
}
