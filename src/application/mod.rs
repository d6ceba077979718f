//! Application layer - conversation and catalogue use cases.
//!
//! `services` holds the single-purpose collaborators (moderation,
//! confirmation, classification); `handlers` composes them into the
//! dialogue protocol and the background catalogue regeneration.

pub mod handlers;
pub mod services;

pub use handlers::dialogue::{DialogueOrchestrator, TurnError, TurnOutcome};
pub use handlers::regeneration::{
    CatalogueRegenerator, RegenerationError, RegenerationState, RegenerationStatus,
    RegenerationTask,
};
pub use services::{FeatureClassifier, ModerationGate, ProfileConfirmer};
