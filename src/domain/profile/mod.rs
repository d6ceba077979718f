//! Requirement profile - what the user wants from a laptop.
//!
//! A profile has five categorical attributes graded low/medium/high and an
//! integer budget. During elicitation the model hands back a loosely typed
//! [`CandidateProfile`]; once confirmed it becomes an immutable
//! [`RequirementProfile`].

mod candidate;
mod level;
mod requirement;

pub use candidate::{CandidateProfile, ProfileError};
pub use level::{rank_of, Attribute, Level, BUDGET_KEY, PROFILE_KEYS, UNKNOWN_RANK};
pub use requirement::{RequirementProfile, DEFAULT_MIN_BUDGET};
