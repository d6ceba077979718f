//! Dialogue handling for laptop-advice conversations.

mod orchestrator;
mod outcome;

pub use orchestrator::{DialogueOrchestrator, ASSISTANT_SEED};
pub use outcome::{TurnError, TurnOutcome};
