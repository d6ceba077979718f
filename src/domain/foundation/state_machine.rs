//! Transition rules for phase-like enums.

use super::ValidationError;

/// An enum whose values form a finite state machine.
///
/// Implementors list the allowed edges; `transition_to` then refuses
/// anything not on that list.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from `self` to `target` is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// All states reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Moves to `target`, or explains why the edge does not exist.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True when no outgoing edge exists.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
