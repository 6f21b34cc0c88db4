//! Profile Store Port - The local user-profile context.
//!
//! Holds the signed-in user's profile between screens. Injected into the
//! onboarding flow instead of being read from ambient storage.

use async_trait::async_trait;

use crate::domain::onboarding::{ProfileUpdate, UserProfile};

/// Errors that can occur during profile store operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("No profile stored")]
    NotFound,

    #[error("Failed to serialize profile: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize profile: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for the local profile context
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load the stored profile, `None` when nobody is signed in.
    async fn load(&self) -> Result<Option<UserProfile>, ProfileStoreError>;

    /// Replace the stored profile.
    async fn save(&self, profile: &UserProfile) -> Result<(), ProfileStoreError>;

    /// Merge `update` into the stored profile and return the result.
    ///
    /// # Errors
    /// Returns `ProfileStoreError::NotFound` if no profile is stored
    async fn update(&self, update: &ProfileUpdate) -> Result<UserProfile, ProfileStoreError> {
        let profile = self
            .load()
            .await?
            .ok_or(ProfileStoreError::NotFound)?
            .merged(update);
        self.save(&profile).await?;
        Ok(profile)
    }

    /// Remove the stored profile (sign-out).
    async fn clear(&self) -> Result<(), ProfileStoreError>;
}
