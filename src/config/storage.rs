//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// YAML file holding the signed-in profile
    #[serde(default = "default_profile_path")]
    pub profile_path: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.profile_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__PROFILE_PATH"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            profile_path: default_profile_path(),
        }
    }
}

fn default_profile_path() -> PathBuf {
    PathBuf::from("./data/aurasync_user_data.yaml")
}
