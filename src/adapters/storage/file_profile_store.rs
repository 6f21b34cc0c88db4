//! File-based Profile Store Adapter
//!
//! Keeps the signed-in profile as a single YAML file. A missing file means
//! nobody is signed in.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::onboarding::UserProfile;
use crate::ports::{ProfileStore, ProfileStoreError};

/// File-based storage for the local profile
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    /// Create a store backed by `path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileProfileStore::new("./data/aurasync_user_data.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<(), ProfileStoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| ProfileStoreError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn load(&self) -> Result<Option<UserProfile>, ProfileStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProfileStoreError::IoError(e.to_string()))?;

        let profile = serde_yaml::from_str(&yaml)
            .map_err(|e| ProfileStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(profile))
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), ProfileStoreError> {
        self.ensure_parent().await?;

        let yaml = serde_yaml::to_string(profile)
            .map_err(|e| ProfileStoreError::SerializationFailed(e.to_string()))?;

        fs::write(&self.path, yaml)
            .await
            .map_err(|e| ProfileStoreError::IoError(e.to_string()))?;

        debug!(path = %self.path.display(), "Profile saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), ProfileStoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .map_err(|e| ProfileStoreError::IoError(e.to_string()))?;
        }
        Ok(())
    }
}
