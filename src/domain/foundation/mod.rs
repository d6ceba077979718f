//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, validation errors and the state machine
//! trait used by the rest of the advisor domain.

mod errors;
mod ids;
mod state_machine;
mod text;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::SessionId;
pub use state_machine::StateMachine;
pub use text::strip_code_fence;
pub use timestamp::Timestamp;
