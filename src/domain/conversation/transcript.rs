//! Model-facing transcripts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Body of a turn: free text, or structured data such as a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnContent {
    Text(String),
    Structured(Value),
}

impl TurnContent {
    /// The text, if this is free-form text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TurnContent::Text(text) => Some(text),
            TurnContent::Structured(_) => None,
        }
    }

    /// Flattens the content into what the model is sent.
    pub fn render(&self) -> String {
        match self {
            TurnContent::Text(text) => text.clone(),
            TurnContent::Structured(value) => value.to_string(),
        }
    }
}

impl From<String> for TurnContent {
    fn from(text: String) -> Self {
        TurnContent::Text(text)
    }
}

impl From<&str> for TurnContent {
    fn from(text: &str) -> Self {
        TurnContent::Text(text.to_string())
    }
}

impl From<Value> for TurnContent {
    fn from(value: Value) -> Self {
        TurnContent::Structured(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
}

/// Ordered turns sent to the model, normally opened by a system prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut transcript = Self::default();
        transcript.push(Role::System, prompt.into());
        transcript
    }

    pub fn push(&mut self, role: Role, content: impl Into<TurnContent>) {
        self.turns.push(Turn {
            role,
            content: content.into(),
        });
    }

    pub fn push_user(&mut self, content: impl Into<TurnContent>) {
        self.push(Role::User, content);
    }

    pub fn push_assistant(&mut self, content: impl Into<TurnContent>) {
        self.push(Role::Assistant, content);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_prompt_opens_the_transcript() {
        let transcript = Transcript::with_system_prompt("be helpful");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::System);
        assert_eq!(transcript.turns()[0].content.as_text(), Some("be helpful"));
    }

    #[test]
    fn turns_keep_insertion_order() {
        let mut transcript = Transcript::default();
        transcript.push_user("hi");
        transcript.push_assistant("hello");

        let roles: Vec<_> = transcript.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(transcript.last().unwrap().content.render(), "hello");
    }

    #[test]
    fn structured_content_renders_as_json() {
        let content = TurnContent::from(json!({"Budget": 50000}));
        assert_eq!(content.as_text(), None);
        assert_eq!(content.render(), r#"{"Budget":50000}"#);
    }
}
