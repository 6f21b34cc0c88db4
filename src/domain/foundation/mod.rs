//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait and the
//! error types that the analysis and onboarding modules build on.

mod errors;
mod ids;
mod percentage;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AnalysisSessionId, Generation};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
