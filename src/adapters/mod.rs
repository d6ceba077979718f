//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - OpenAI completion and moderation clients, retry decorator, test doubles
//! - `catalogue` - CSV catalogue files
//! - `session` - in-memory session store
//! - `http` - axum JSON API

pub mod ai;
pub mod catalogue;
pub mod http;
pub mod session;

pub use ai::{
    MockAIProvider, MockModerator, OpenAIConfig, OpenAIModerator, OpenAIProvider, RetryPolicy,
    RetryingProvider,
};
pub use catalogue::{CatalogueColumns, CsvCatalogue};
pub use session::InMemorySessionStore;
