//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, percentages, errors, state machine)
//! - `personality` - Fixed questionnaire and the four-letter scorer
//! - `analysis` - Capture attempts, majority vote and the per-kind session
//! - `onboarding` - Step sequence, user profile and landing routes

pub mod analysis;
pub mod foundation;
pub mod onboarding;
pub mod personality;
