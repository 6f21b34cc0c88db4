//! State machine trait for phase and step enums.
//!
//! Analysis phases and onboarding steps are both small closed enums whose
//! legal moves are fixed. Implementors list the legal edges once and get a
//! validated `transition_to` for free.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for AnalysisPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, Capturing) | (Capturing, Classifying))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Idle => vec![Capturing],
///             // ...
///         }
///     }
/// }
///
/// let phase = AnalysisPhase::Idle.transition_to(AnalysisPhase::Capturing)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
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

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
