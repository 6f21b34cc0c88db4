//! Integration tests for the onboarding flow.
//!
//! Drives a full pass from sign-in to landing route against the file-backed
//! profile store and a recording backend.

use std::sync::Arc;

use aurasync::adapters::{
    FileProfileStore, MockImageClassifier, RecordingProfileSync, ScriptedCaptureDevice,
};
use aurasync::application::{
    AnalysisController, CaptureReconciler, OnboardingFlow, ReconcilerConfig,
};
use aurasync::domain::analysis::{AnalysisKind, CapturedImage, Gender, Label};
use aurasync::domain::onboarding::{LandingRoute, OnboardingStep, UserProfile};
use aurasync::ports::{NoopListener, ProfileStore, ProfileSyncError};
use tempfile::TempDir;

fn controller(gender: Gender, classifier: MockImageClassifier) -> AnalysisController {
    let reconciler = Arc::new(CaptureReconciler::new(
        Arc::new(classifier),
        ReconcilerConfig::default(),
    ));
    AnalysisController::new(
        gender,
        reconciler,
        Arc::new(ScriptedCaptureDevice::new()),
        Arc::new(NoopListener),
    )
    .expect("controller")
}

fn signed_in(email: &str) -> UserProfile {
    let mut profile = UserProfile::new(email);
    profile.id = Some("42".to_string());
    profile
}

#[tokio::test(start_paused = true)]
async fn full_onboarding_pass_persists_results() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileProfileStore::new(dir.path().join("profile.yaml")));
    let sync = RecordingProfileSync::new().with_current(signed_in("sam@example.com"));
    let mut flow = OnboardingFlow::new(store.clone(), Arc::new(sync.clone()));

    assert_eq!(flow.sign_in().await.unwrap(), LandingRoute::Onboarding);
    flow.submit_basic_info("Sam", Some(Gender::Male)).await.unwrap();

    let classifier = MockImageClassifier::new()
        .with_label("Cool")
        .with_label("Warm")
        .with_label("Cool")
        .with_label("Square");
    let controller = controller(Gender::Male, classifier);

    controller.start_camera(AnalysisKind::SkinTone).await.unwrap();
    controller.wait_idle().await;
    controller
        .analyze_upload(AnalysisKind::FaceShape, CapturedImage::jpeg(vec![1]))
        .await
        .unwrap();
    assert_eq!(flow.advance(&controller).await.unwrap(), OnboardingStep::BodyAnalysis);

    controller
        .manual_override(AnalysisKind::BodyShape, Label::new("Ectomorph"))
        .await
        .unwrap();
    assert_eq!(
        flow.advance(&controller).await.unwrap(),
        OnboardingStep::PersonalityAnalysis
    );

    // Every answer pushes its axis toward the second letter.
    let answers = [1, 5, 5, 1, 1, 5, 5, 1, 1, 5, 1, 1, 1, 5, 5, 1];
    let code = controller.record_personality(&answers).await.unwrap();
    assert_eq!(code.to_string(), "ENFP");

    assert_eq!(flow.complete(&controller).await.unwrap(), LandingRoute::Male);

    let submitted = sync.submissions();
    assert_eq!(submitted.len(), 1);
    let record = &submitted[0];
    assert!(record.onboarding_completed);
    assert_eq!(record.name, "Sam");
    assert_eq!(record.skin_tone.as_deref(), Some("Cool"));
    assert_eq!(record.face_shape.as_deref(), Some("Square"));
    assert_eq!(record.body_shape.as_deref(), Some("Ectomorph"));
    assert_eq!(record.personality.as_deref(), Some("ENFP"));

    // A fresh store over the same file sees the finished profile.
    let reopened = FileProfileStore::new(dir.path().join("profile.yaml"));
    let profile = reopened.load().await.unwrap().unwrap();
    assert!(profile.onboarding_completed);
    assert_eq!(profile.id.as_deref(), Some("42"));
    assert_eq!(LandingRoute::for_profile(Some(&profile)), LandingRoute::Male);
}

#[tokio::test]
async fn skipped_kinds_are_submitted_as_null() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileProfileStore::new(dir.path().join("profile.yaml")));
    let sync = RecordingProfileSync::new();
    let mut flow = OnboardingFlow::new(store, Arc::new(sync.clone()));

    flow.begin(signed_in("kim@example.com")).await.unwrap();
    flow.submit_basic_info("Kim", Some(Gender::Female)).await.unwrap();

    let controller = controller(Gender::Female, MockImageClassifier::new());
    controller
        .manual_override(AnalysisKind::SkinTone, Label::new("Neutral"))
        .await
        .unwrap();
    controller.skip(AnalysisKind::FaceShape).await.unwrap();
    flow.advance(&controller).await.unwrap();
    controller.skip(AnalysisKind::BodyShape).await.unwrap();
    flow.advance(&controller).await.unwrap();
    controller.skip(AnalysisKind::Personality).await.unwrap();

    assert_eq!(flow.complete(&controller).await.unwrap(), LandingRoute::Female);
    let json = serde_json::to_value(&sync.submissions()[0]).unwrap();
    assert_eq!(json["skin_tone"], "Neutral");
    assert!(json["face_shape"].is_null());
    assert!(json["body_shape"].is_null());
    assert!(json["personality"].is_null());
}

#[tokio::test]
async fn backend_rejection_does_not_block_landing() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileProfileStore::new(dir.path().join("profile.yaml")));
    let sync = RecordingProfileSync::failing(ProfileSyncError::Rejected {
        status: 422,
        detail: "bad gender".to_string(),
    });
    let mut flow = OnboardingFlow::new(store.clone(), Arc::new(sync));

    flow.begin(signed_in("lee@example.com")).await.unwrap();
    flow.submit_basic_info("Lee", Some(Gender::Male)).await.unwrap();
    let controller = controller(Gender::Male, MockImageClassifier::new());
    controller
        .manual_override(AnalysisKind::SkinTone, Label::new("Warm"))
        .await
        .unwrap();
    flow.advance(&controller).await.unwrap();
    flow.advance(&controller).await.unwrap();

    assert_eq!(flow.complete(&controller).await.unwrap(), LandingRoute::Male);
    assert!(store.load().await.unwrap().unwrap().onboarding_completed);
}
