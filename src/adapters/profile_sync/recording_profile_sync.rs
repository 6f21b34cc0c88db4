//! Recording Profile Sync for testing.
//!
//! Remembers every submission and answers from a configurable profile, or
//! fails every call when built with `failing`.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::onboarding::{OnboardingSubmission, UserProfile};
use crate::ports::{ProfileSync, ProfileSyncError};

#[derive(Debug, Clone, Default)]
pub struct RecordingProfileSync {
    current: Arc<Mutex<Option<UserProfile>>>,
    submissions: Arc<Mutex<Vec<OnboardingSubmission>>>,
    failure: Option<ProfileSyncError>,
}

impl RecordingProfileSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(self, profile: UserProfile) -> Self {
        *self.current.lock().unwrap() = Some(profile);
        self
    }

    /// Every call fails with `error`.
    pub fn failing(error: ProfileSyncError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn submissions(&self) -> Vec<OnboardingSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileSync for RecordingProfileSync {
    async fn persist(
        &self,
        submission: &OnboardingSubmission,
    ) -> Result<UserProfile, ProfileSyncError> {
        self.submissions.lock().unwrap().push(submission.clone());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let mut current = self.current.lock().unwrap();
        let mut profile = current.clone().unwrap_or_default();
        profile.onboarding_completed = true;
        profile.name = submission.name.clone();
        profile.gender = Some(submission.gender);
        profile.skin_tone = submission.skin_tone.clone();
        profile.face_shape = submission.face_shape.clone();
        profile.body_shape = submission.body_shape.clone();
        profile.personality = submission.personality.clone();
        *current = Some(profile.clone());
        Ok(profile)
    }

    async fn fetch_current(&self) -> Result<UserProfile, ProfileSyncError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or(ProfileSyncError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::Gender;

    fn submission() -> OnboardingSubmission {
        OnboardingSubmission {
            onboarding_completed: true,
            name: "Ravi".to_string(),
            gender: Gender::Male,
            skin_tone: Some("Warm".to_string()),
            face_shape: None,
            body_shape: None,
            personality: Some("ENFP".to_string()),
        }
    }

    #[tokio::test]
    async fn records_and_reflects_submission() {
        let sync = RecordingProfileSync::new().with_current(UserProfile::new("r@x.io"));
        let stored = sync.persist(&submission()).await.unwrap();
        assert!(stored.onboarding_completed);
        assert_eq!(stored.email, "r@x.io");
        assert_eq!(sync.fetch_current().await.unwrap(), stored);
        assert_eq!(sync.submissions().len(), 1);
    }

    #[tokio::test]
    async fn failing_sync_still_records() {
        let sync = RecordingProfileSync::failing(ProfileSyncError::Network("down".into()));
        assert!(sync.persist(&submission()).await.is_err());
        assert_eq!(sync.submissions().len(), 1);
    }
}
