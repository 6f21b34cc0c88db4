//! Profile Sync Port - Remote persistence of the user record.

use async_trait::async_trait;

use crate::domain::onboarding::{OnboardingSubmission, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileSyncError {
    #[error("not authenticated")]
    Unauthenticated,

    /// Backend rejected the request; `detail` is its error message.
    #[error("backend returned HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Port for the backend's user endpoints.
#[async_trait]
pub trait ProfileSync: Send + Sync {
    /// Stores the completed onboarding record and returns the backend's view.
    async fn persist(&self, submission: &OnboardingSubmission)
        -> Result<UserProfile, ProfileSyncError>;

    /// Fetches the signed-in user's profile.
    async fn fetch_current(&self) -> Result<UserProfile, ProfileSyncError>;
}
