//! Session adapters.

mod in_memory_session_store;

pub use in_memory_session_store::{InMemorySessionStore, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS};
