//! Content Moderator Port - safety classification of free text.

use async_trait::async_trait;

use super::AIError;

/// Classifies text as acceptable or not.
///
/// Implementations make a single attempt; transient failures are
/// returned to the caller rather than retried.
#[async_trait]
pub trait ContentModerator: Send + Sync {
    /// Returns true when `text` is flagged.
    async fn is_flagged(&self, text: &str) -> Result<bool, AIError>;
}
