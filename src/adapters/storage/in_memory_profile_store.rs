//! In-Memory Profile Store Adapter
//!
//! Useful for testing and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::onboarding::UserProfile;
use crate::ports::{ProfileStore, ProfileStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profile: Arc<RwLock<Option<UserProfile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a signed-in profile
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: Arc::new(RwLock::new(Some(profile))),
        }
    }

    pub async fn snapshot(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self) -> Result<Option<UserProfile>, ProfileStoreError> {
        Ok(self.profile.read().await.clone())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), ProfileStoreError> {
        *self.profile.write().await = Some(profile.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ProfileStoreError> {
        *self.profile.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::onboarding::ProfileUpdate;

    #[tokio::test]
    async fn lifecycle() {
        let store = InMemoryProfileStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&UserProfile::new("a@b.c")).await.unwrap();
        let updated = store.update(&ProfileUpdate::completed()).await.unwrap();
        assert!(updated.onboarding_completed);
        assert_eq!(store.snapshot().await, Some(updated));

        store.clear().await.unwrap();
        assert_eq!(store.snapshot().await, None);
    }
}
