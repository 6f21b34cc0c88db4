//! HTTP Profile Sync - Implementation of ProfileSync for the backend's auth endpoints.
//!
//! - `GET /auth/me` returns the signed-in user
//! - `PUT /auth/update-onboarding` stores the completed onboarding record
//!
//! Both require a bearer token. Error bodies carry a `detail` message.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::adapters::backend_client::{error_detail, BackendClientConfig};
use crate::domain::onboarding::{OnboardingSubmission, UserProfile};
use crate::ports::{ProfileSync, ProfileSyncError};

const ME_PATH: &str = "/auth/me";
const UPDATE_ONBOARDING_PATH: &str = "/auth/update-onboarding";

pub struct HttpProfileSync {
    config: BackendClientConfig,
    client: Client,
}

impl HttpProfileSync {
    pub fn new(config: BackendClientConfig) -> Result<Self, ProfileSyncError> {
        let client = config.build_client().map_err(|e| {
            ProfileSyncError::Network(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self { config, client })
    }

    fn bearer(&self) -> Result<String, ProfileSyncError> {
        self.config.bearer().ok_or(ProfileSyncError::Unauthenticated)
    }

    async fn read_profile(response: Response) -> Result<UserProfile, ProfileSyncError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProfileSyncError::Unauthenticated);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(status.as_u16(), &body);
            warn!(status = status.as_u16(), detail = %detail, "Backend rejected profile request");
            return Err(ProfileSyncError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        response
            .json::<UserProfile>()
            .await
            .map_err(|e| ProfileSyncError::Parse(format!("Failed to parse profile: {}", e)))
    }
}

fn network_error(e: reqwest::Error) -> ProfileSyncError {
    if e.is_timeout() {
        ProfileSyncError::Network(format!("Request timed out: {}", e))
    } else {
        ProfileSyncError::Network(e.to_string())
    }
}

#[async_trait]
impl ProfileSync for HttpProfileSync {
    async fn persist(
        &self,
        submission: &OnboardingSubmission,
    ) -> Result<UserProfile, ProfileSyncError> {
        let response = self
            .client
            .put(self.config.url(UPDATE_ONBOARDING_PATH))
            .header("Authorization", self.bearer()?)
            .json(submission)
            .send()
            .await
            .map_err(network_error)?;
        let profile = Self::read_profile(response).await?;
        debug!(email = %profile.email, "Onboarding record stored");
        Ok(profile)
    }

    async fn fetch_current(&self) -> Result<UserProfile, ProfileSyncError> {
        let response = self
            .client
            .get(self.config.url(ME_PATH))
            .header("Authorization", self.bearer()?)
            .send()
            .await
            .map_err(network_error)?;
        Self::read_profile(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_token_is_unauthenticated_without_a_request() {
        let sync = HttpProfileSync::new(BackendClientConfig::new("http://127.0.0.1:9")).unwrap();
        assert!(sync.config.bearer().is_none());
        assert_eq!(
            sync.fetch_current().await.unwrap_err(),
            ProfileSyncError::Unauthenticated
        );
    }
}
