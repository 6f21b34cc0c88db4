//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AURASYNC` prefix and nested values use double underscores as separators.
//! Every setting has a default, so an empty environment yields a working
//! local configuration.
//!
//! # Example
//!
//! ```no_run
//! use aurasync::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! config.logging.init_tracing()?;
//!
//! println!("Classifying against {}", config.backend.base_url);
//! # Ok::<(), aurasync::config::ConfigError>(())
//! ```

mod backend;
mod capture;
mod error;
mod logging;
mod storage;

pub use backend::BackendConfig;
pub use capture::CaptureConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Analysis backend (classifier and auth endpoints)
    #[serde(default)]
    pub backend: BackendConfig,

    /// Camera capture timing and vote size
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Local profile file
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AURASYNC` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AURASYNC__BACKEND__BASE_URL=...` -> `backend.base_url = ...`
    /// - `AURASYNC__CAPTURE__MAX_ATTEMPTS=5` -> `capture.max_attempts = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("AURASYNC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.backend.validate()?;
        self.capture.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
