//! Application layer - handlers that drive analysis sessions and onboarding.
//!
//! This layer coordinates domain state with the classifier, capture device,
//! profile store and backend ports.

pub mod handlers;

pub use handlers::{
    AnalysisController, AttemptSink, CaptureReconciler, CaptureSource, OnboardingFlow,
    OnboardingFlowError, ReconcilerConfig, ReconciliationResult, SessionSink,
};
