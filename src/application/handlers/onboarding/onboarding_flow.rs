//! OnboardingFlow - Walks a signed-in user from basic info to completion.
//!
//! Holds the current step, writes partial results into the local profile
//! store as steps are left, and persists the finished record remotely.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::analysis::{AnalysisError, Gender};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::onboarding::{
    LandingRoute, OnboardingError, OnboardingStep, OnboardingSubmission, ProfileUpdate,
    UserProfile,
};
use crate::ports::{ProfileStore, ProfileStoreError, ProfileSync, ProfileSyncError};

use super::super::capture::AnalysisController;

#[derive(Debug, Error)]
pub enum OnboardingFlowError {
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    #[error("Profile store failed: {0}")]
    Store(#[from] ProfileStoreError),

    #[error("Could not load the signed-in profile: {0}")]
    SignIn(#[from] ProfileSyncError),
}

impl OnboardingFlowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OnboardingFlowError::Onboarding(e) => e.code(),
            OnboardingFlowError::Store(_) => ErrorCode::StorageError,
            OnboardingFlowError::SignIn(_) => ErrorCode::BackendError,
        }
    }
}

impl From<AnalysisError> for OnboardingFlowError {
    fn from(err: AnalysisError) -> Self {
        OnboardingFlowError::Onboarding(err.into())
    }
}

impl From<OnboardingFlowError> for DomainError {
    fn from(err: OnboardingFlowError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

pub struct OnboardingFlow {
    store: Arc<dyn ProfileStore>,
    sync: Arc<dyn ProfileSync>,
    step: OnboardingStep,
}

impl OnboardingFlow {
    pub fn new(store: Arc<dyn ProfileStore>, sync: Arc<dyn ProfileSync>) -> Self {
        Self {
            store,
            sync,
            step: OnboardingStep::Login,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    /// Fetches the signed-in profile from the backend and begins with it.
    pub async fn sign_in(&mut self) -> Result<LandingRoute, OnboardingFlowError> {
        let profile = self.sync.fetch_current().await?;
        self.begin(profile).await
    }

    /// Stores the signed-in profile. Onboarded users get their landing
    /// route; everyone else continues at basic info.
    pub async fn begin(&mut self, profile: UserProfile) -> Result<LandingRoute, OnboardingFlowError> {
        self.store.save(&profile).await?;
        let route = LandingRoute::for_profile(Some(&profile));
        self.step = match route {
            LandingRoute::Onboarding => OnboardingStep::BasicInfo,
            _ => OnboardingStep::Complete,
        };
        info!(email = %profile.email, route = %route, "Onboarding started");
        Ok(route)
    }

    pub async fn submit_basic_info(
        &mut self,
        name: &str,
        gender: Option<Gender>,
    ) -> Result<UserProfile, OnboardingFlowError> {
        self.expect_step(OnboardingStep::BasicInfo, OnboardingStep::SkinFaceAnalysis)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(OnboardingError::MissingField("name").into());
        }
        let gender = gender.ok_or(OnboardingError::MissingField("gender"))?;

        let profile = self.update(&ProfileUpdate::basic_info(name, gender)).await?;
        self.step = OnboardingStep::SkinFaceAnalysis;
        Ok(profile)
    }

    /// Leaves an analysis step once its required kinds have results.
    ///
    /// The last analysis step is left through [`complete`](Self::complete).
    pub async fn advance(
        &mut self,
        controller: &AnalysisController,
    ) -> Result<OnboardingStep, OnboardingFlowError> {
        let from = self.step;
        let to = match from.next() {
            Some(next) if from.is_analysis() && next != OnboardingStep::Complete => next,
            Some(next) => return Err(OnboardingError::InvalidStep { from, to: next }.into()),
            None => return Err(OnboardingError::InvalidStep { from, to: from }.into()),
        };
        self.gate(from, controller).await?;

        self.update(&controller.assemble_profile_update().await).await?;
        self.step = to;
        info!(from = %from, to = %to, "Onboarding step advanced");
        Ok(to)
    }

    pub fn back(&mut self) -> Result<OnboardingStep, OnboardingFlowError> {
        let from = self.step;
        let to = from.previous().ok_or(OnboardingError::InvalidStep {
            from,
            to: OnboardingStep::BasicInfo,
        })?;
        self.step = to;
        Ok(to)
    }

    /// Persists the finished record and returns the landing route.
    ///
    /// A backend failure is logged and does not block completion.
    pub async fn complete(
        &mut self,
        controller: &AnalysisController,
    ) -> Result<LandingRoute, OnboardingFlowError> {
        self.expect_step(OnboardingStep::PersonalityAnalysis, OnboardingStep::Complete)?;
        for step in [
            OnboardingStep::SkinFaceAnalysis,
            OnboardingStep::BodyAnalysis,
            OnboardingStep::PersonalityAnalysis,
        ] {
            self.gate(step, controller).await?;
        }

        let profile = self.update(&controller.assemble_profile_update().await).await?;
        let submission = OnboardingSubmission::from_profile(&profile)?;
        match self.sync.persist(&submission).await {
            Ok(remote) => info!(id = ?remote.id, "Onboarding record saved"),
            Err(e) => warn!(error = %e, "Failed to save onboarding record, continuing"),
        }

        let profile = self.update(&ProfileUpdate::completed()).await?;
        self.step = OnboardingStep::Complete;
        let route = LandingRoute::for_profile(Some(&profile));
        info!(route = %route, "Onboarding complete");
        Ok(route)
    }

    async fn gate(
        &self,
        step: OnboardingStep,
        controller: &AnalysisController,
    ) -> Result<(), OnboardingFlowError> {
        match controller.ensure_can_advance(step).await {
            Ok(()) => Ok(()),
            Err(AnalysisError::MandatoryKind(kind)) => {
                Err(OnboardingError::StepIncomplete { step, kind }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, update: &ProfileUpdate) -> Result<UserProfile, OnboardingFlowError> {
        match self.store.update(update).await {
            Err(ProfileStoreError::NotFound) => Err(OnboardingError::NotSignedIn.into()),
            other => Ok(other?),
        }
    }

    fn expect_step(
        &self,
        expected: OnboardingStep,
        to: OnboardingStep,
    ) -> Result<(), OnboardingError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(OnboardingError::InvalidStep {
                from: self.step,
                to,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryProfileStore, MockImageClassifier, RecordingProfileSync, ScriptedCaptureDevice,
    };
    use crate::application::handlers::capture::{CaptureReconciler, ReconcilerConfig};
    use crate::domain::analysis::{AnalysisKind, Label};
    use crate::ports::NoopListener;

    fn controller(gender: Gender) -> AnalysisController {
        let reconciler = Arc::new(CaptureReconciler::new(
            Arc::new(MockImageClassifier::new()),
            ReconcilerConfig::default(),
        ));
        AnalysisController::new(
            gender,
            reconciler,
            Arc::new(ScriptedCaptureDevice::new()),
            Arc::new(NoopListener),
        )
        .unwrap()
    }

    fn flow(sync: RecordingProfileSync) -> (OnboardingFlow, Arc<InMemoryProfileStore>) {
        let store = Arc::new(InMemoryProfileStore::new());
        (OnboardingFlow::new(store.clone(), Arc::new(sync)), store)
    }

    #[tokio::test]
    async fn onboarded_user_skips_to_landing_route() {
        let (mut flow, _) = flow(RecordingProfileSync::new());
        let mut profile = UserProfile::new("a@b.c");
        profile.gender = Some(Gender::Male);
        profile.onboarding_completed = true;

        assert_eq!(flow.begin(profile).await.unwrap(), LandingRoute::Male);
        assert_eq!(flow.step(), OnboardingStep::Complete);
    }

    #[tokio::test]
    async fn sign_in_uses_backend_profile() {
        let sync = RecordingProfileSync::new().with_current(UserProfile::new("a@b.c"));
        let (mut flow, store) = flow(sync);

        assert_eq!(flow.sign_in().await.unwrap(), LandingRoute::Onboarding);
        assert_eq!(flow.step(), OnboardingStep::BasicInfo);
        assert_eq!(store.snapshot().await.unwrap().email, "a@b.c");
    }

    #[tokio::test]
    async fn basic_info_requires_name_and_gender() {
        let (mut flow, _) = flow(RecordingProfileSync::new());
        flow.begin(UserProfile::new("a@b.c")).await.unwrap();

        let err = flow.submit_basic_info("  ", Some(Gender::Female)).await.unwrap_err();
        assert!(matches!(
            err,
            OnboardingFlowError::Onboarding(OnboardingError::MissingField("name"))
        ));
        let err = flow.submit_basic_info("Ana", None).await.unwrap_err();
        assert!(matches!(
            err,
            OnboardingFlowError::Onboarding(OnboardingError::MissingField("gender"))
        ));

        let profile = flow.submit_basic_info("Ana", Some(Gender::Female)).await.unwrap();
        assert!(profile.has_basic_info());
        assert_eq!(flow.step(), OnboardingStep::SkinFaceAnalysis);
    }

    #[tokio::test]
    async fn skin_face_step_is_gated_on_skin_tone() {
        let (mut flow, store) = flow(RecordingProfileSync::new());
        flow.begin(UserProfile::new("a@b.c")).await.unwrap();
        flow.submit_basic_info("Ana", Some(Gender::Female)).await.unwrap();
        let controller = controller(Gender::Female);

        let err = flow.advance(&controller).await.unwrap_err();
        assert!(matches!(
            err,
            OnboardingFlowError::Onboarding(OnboardingError::StepIncomplete {
                kind: AnalysisKind::SkinTone,
                ..
            })
        ));
        assert_eq!(err.code(), ErrorCode::StepIncomplete);

        controller
            .manual_override(AnalysisKind::SkinTone, Label::new("Cool"))
            .await
            .unwrap();
        assert_eq!(flow.advance(&controller).await.unwrap(), OnboardingStep::BodyAnalysis);
        assert_eq!(
            store.snapshot().await.unwrap().skin_tone.as_deref(),
            Some("Cool")
        );
    }

    #[tokio::test]
    async fn back_only_between_analysis_steps() {
        let (mut flow, _) = flow(RecordingProfileSync::new());
        flow.begin(UserProfile::new("a@b.c")).await.unwrap();
        assert!(flow.back().is_err());

        flow.submit_basic_info("Ana", Some(Gender::Female)).await.unwrap();
        assert_eq!(flow.back().unwrap(), OnboardingStep::BasicInfo);
    }

    #[tokio::test]
    async fn complete_survives_backend_failure() {
        let sync = RecordingProfileSync::failing(ProfileSyncError::Network("down".into()));
        let (mut flow, store) = flow(sync.clone());
        flow.begin(UserProfile::new("a@b.c")).await.unwrap();
        flow.submit_basic_info("Ana", Some(Gender::Female)).await.unwrap();

        let controller = controller(Gender::Female);
        controller
            .manual_override(AnalysisKind::SkinTone, Label::new("Warm"))
            .await
            .unwrap();
        flow.advance(&controller).await.unwrap();
        controller.skip(AnalysisKind::BodyShape).await.unwrap();
        flow.advance(&controller).await.unwrap();

        assert_eq!(flow.complete(&controller).await.unwrap(), LandingRoute::Female);
        assert_eq!(flow.step(), OnboardingStep::Complete);

        let submitted = sync.submissions();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].skin_tone.as_deref(), Some("Warm"));
        assert_eq!(submitted[0].body_shape, None);
        assert!(store.snapshot().await.unwrap().onboarding_completed);
    }

    #[tokio::test]
    async fn advance_without_profile_is_not_signed_in() {
        let (mut flow, _) = flow(RecordingProfileSync::new());
        flow.step = OnboardingStep::BodyAnalysis;
        let err = flow.advance(&controller(Gender::Male)).await.unwrap_err();
        assert!(matches!(
            err,
            OnboardingFlowError::Onboarding(OnboardingError::NotSignedIn)
        ));
    }
}
