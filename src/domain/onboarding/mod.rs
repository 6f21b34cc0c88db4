//! Onboarding module - step sequence, user profile and landing routes.

mod errors;
mod profile;
mod routing;
mod step;

pub use errors::OnboardingError;
pub use profile::{AnalysisResults, OnboardingSubmission, ProfileUpdate, UserProfile};
pub use routing::{
    should_show_gender_homepage, should_show_guest_ui, should_show_onboarding, LandingRoute,
};
pub use step::OnboardingStep;
