//! Application handlers.
//!
//! Orchestrate domain state machines over the ports.

pub mod capture;
pub mod onboarding;

pub use capture::{
    AnalysisController, AttemptSink, CaptureReconciler, CaptureSource, ReconcilerConfig,
    ReconciliationResult, SessionSink,
};
pub use onboarding::{OnboardingFlow, OnboardingFlowError};
