//! Capture handlers - reconciliation of noisy classifications and the
//! controller that sequences analysis kinds for one onboarding pass.

mod analysis_controller;
mod reconcile;

pub use analysis_controller::AnalysisController;
pub use reconcile::{
    AttemptSink, CaptureReconciler, CaptureSource, ReconcilerConfig, ReconciliationResult,
    SessionSink,
};
