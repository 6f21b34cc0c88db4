//! Onboarding handlers.

mod onboarding_flow;

pub use onboarding_flow::{OnboardingFlow, OnboardingFlowError};
