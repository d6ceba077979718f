//! Session Store Port - maps session ids to conversation contexts.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::conversation::ConversationContext;
use crate::domain::foundation::SessionId;

/// A context shared between requests of the same session.
///
/// Holding the lock for a whole turn serializes turns within a session.
pub type SharedContext = Arc<Mutex<ConversationContext>>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new context under its own session id.
    async fn insert(&self, context: ConversationContext) -> SharedContext;

    async fn get(&self, id: &SessionId) -> Option<SharedContext>;

    /// Drops a session. Returns false if it did not exist.
    async fn remove(&self, id: &SessionId) -> bool;

    async fn count(&self) -> usize;
}
