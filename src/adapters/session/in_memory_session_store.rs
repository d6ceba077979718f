//! In-memory session store.
//!
//! Contexts live only as long as the process. Each context sits behind its
//! own mutex so different sessions progress independently while turns of
//! one session are serialized.
//!
//! Sessions idle for longer than the idle timeout are dropped: lazily on
//! lookup, on every insert, and by the optional background sweeper. The
//! map never holds more than `max_sessions` entries; inserting into a full
//! store evicts the least recently active sessions first.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

use crate::domain::conversation::ConversationContext;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{SessionStore, SharedContext};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct SessionEntry {
    context: SharedContext,
    last_active: Timestamp,
}

impl SessionEntry {
    fn is_idle_at(&self, now: Timestamp, idle_timeout: Duration) -> bool {
        now.duration_since(&self.last_active)
            .to_std()
            .map_or(false, |idle| idle > idle_timeout)
    }
}

#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// At least one session is always kept.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Drops every session idle for longer than the idle timeout.
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Timestamp::now()).await
    }

    async fn evict_idle_at(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        remove_idle(&mut sessions, now, self.idle_timeout)
    }

    /// Runs `evict_idle` every `every` until the returned handle is aborted.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(every);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    info!(evicted, "Evicted idle sessions");
                }
            }
        })
    }
}

fn remove_idle(
    sessions: &mut HashMap<SessionId, SessionEntry>,
    now: Timestamp,
    idle_timeout: Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_idle_at(now, idle_timeout));
    before - sessions.len()
}

fn remove_least_recent(sessions: &mut HashMap<SessionId, SessionEntry>, keep: usize) {
    if sessions.len() <= keep {
        return;
    }
    let mut by_activity: Vec<(SessionId, Timestamp)> = sessions
        .iter()
        .map(|(id, entry)| (*id, entry.last_active))
        .collect();
    by_activity.sort_by_key(|(_, last_active)| *last_active);

    let excess = sessions.len() - keep;
    for (id, _) in by_activity.into_iter().take(excess) {
        sessions.remove(&id);
    }
    debug!(evicted = excess, "Session store full, evicted least recently active sessions");
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, context: ConversationContext) -> SharedContext {
        let id = context.session_id();
        let shared = Arc::new(Mutex::new(context));
        let now = Timestamp::now();

        let mut sessions = self.sessions.write().await;
        remove_idle(&mut sessions, now, self.idle_timeout);
        remove_least_recent(&mut sessions, self.max_sessions - 1);
        sessions.insert(
            id,
            SessionEntry {
                context: Arc::clone(&shared),
                last_active: now,
            },
        );
        shared
    }

    /// Looking a session up counts as activity. An idle session is removed
    /// instead of being returned.
    async fn get(&self, id: &SessionId) -> Option<SharedContext> {
        let now = Timestamp::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        if entry.is_idle_at(now, self.idle_timeout) {
            sessions.remove(id);
            debug!(session_id = %id, "Session expired");
            return None;
        }
        entry.last_active = now;
        Some(Arc::clone(&entry.context))
    }

    async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
