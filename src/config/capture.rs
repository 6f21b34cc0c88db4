//! Camera capture configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Automated capture settings
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// Wait before each camera attempt, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Attempts voted on per camera run
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl CaptureConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        if self.interval_ms > 60_000 {
            return Err(ValidationError::InvalidInterval);
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_max_attempts() -> usize {
    3
}
