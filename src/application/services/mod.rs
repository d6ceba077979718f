//! Services used by the dialogue and regeneration handlers.

mod feature_classifier;
mod moderation_gate;
mod profile_confirmation;

pub use feature_classifier::{ClassificationError, FeatureClassifier};
pub use moderation_gate::{ModerationGate, ModerationVerdict};
pub use profile_confirmation::{
    ConfirmationError, ConfirmationResult, ConfirmationVerdict, ProfileConfirmer, CONFIRMATION_SEED,
};
