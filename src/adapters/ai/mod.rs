//! AI adapters - language model and moderation clients.
//!
//! - `OpenAIProvider` / `OpenAIModerator` - HTTP clients for OpenAI
//! - `RetryingProvider` - backoff decorator for completion calls
//! - `MockAIProvider` / `MockModerator` - scripted doubles for tests

mod mock_moderator;
mod mock_provider;
mod openai_moderator;
mod openai_provider;
mod retrying_provider;

pub use mock_moderator::MockModerator;
pub use mock_provider::{MockAIProvider, DEFAULT_MOCK_REPLY};
pub use openai_moderator::OpenAIModerator;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use retrying_provider::{RetryPolicy, RetryingProvider};
