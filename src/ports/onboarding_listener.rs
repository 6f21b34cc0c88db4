//! Onboarding Listener Port - Callbacks from the analysis controller.
//!
//! The controller reports results and skips here and has no opinion on
//! navigation; the surrounding flow decides what happens next.

use crate::domain::analysis::AnalysisKind;

pub trait OnboardingListener: Send + Sync {
    /// A kind finished with `label` (a voted, uploaded or manual result).
    fn on_complete(&self, kind: AnalysisKind, label: &str);

    /// The user skipped an optional kind.
    fn on_skip(&self, kind: AnalysisKind);
}

/// Listener that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl OnboardingListener for NoopListener {
    fn on_complete(&self, _kind: AnalysisKind, _label: &str) {}

    fn on_skip(&self, _kind: AnalysisKind) {}
}
