//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the advisor core and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - chat completions, optionally with function calling
//! - `ContentModerator` - safety classification of free text
//! - `CatalogueReader` / `CatalogueSource` - scored catalogue and its regeneration
//! - `SessionStore` - per-session conversation contexts

mod ai_provider;
mod catalogue_store;
mod content_moderator;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionOutput, CompletionRequest, CompletionResponse, FinishReason,
    FunctionCallMode, Message, ProviderInfo, TokenUsage,
};
pub use catalogue_store::{CatalogueReader, CatalogueSource, RawCatalogue};
pub use content_moderator::ContentModerator;
pub use session_store::{SessionStore, SharedContext};
