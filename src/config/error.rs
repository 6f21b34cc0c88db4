//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Logging initialisation failed: {0}")]
    LoggingInit(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Backend URL must start with http:// or https://")]
    InvalidBackendUrl,

    #[error("Backend timeout must be between 1 and 120 seconds")]
    InvalidTimeout,

    #[error("Capture attempts must be between 1 and 10")]
    InvalidMaxAttempts,

    #[error("Capture interval must be at most 60000 ms")]
    InvalidInterval,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
