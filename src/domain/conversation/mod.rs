//! Conversation domain - phases, transcripts and per-session context.

mod chat_log;
mod context;
mod functions;
mod phase;
pub mod prompts;
mod transcript;

pub use chat_log::{ChatEntry, ChatLog, Speaker};
pub use context::{ContextError, ConversationContext};
pub use functions::{
    declared_functions, FunctionCall, FunctionCallError, FunctionDefinition, FunctionInvocation,
    ProfileFunction,
};
pub use phase::ConversationPhase;
pub use transcript::{Role, Transcript, Turn, TurnContent};
