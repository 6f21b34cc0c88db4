//! Analysis phase state machine and acquisition methods.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// How images (or a label) are obtained for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMethod {
    Camera,
    Upload,
    Manual,
}

/// Lifecycle of one analysis session.
///
/// ```text
/// Idle -> Capturing -> Classifying -> (Capturing ...) -> Finalizing -> Done
///   any -> ManualOverride -> Done
///   any -> Idle (reset)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    Idle,
    Capturing,
    Classifying,
    Finalizing,
    /// Waiting for the user to pick from the manual choice set.
    ManualOverride,
    Done,
}

impl AnalysisPhase {
    /// A capture task may own the camera or a classifier call in these phases.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AnalysisPhase::Capturing | AnalysisPhase::Classifying | AnalysisPhase::Finalizing
        )
    }
}

impl StateMachine for AnalysisPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AnalysisPhase::*;
        match self {
            Idle => vec![Capturing, ManualOverride],
            Capturing => vec![Classifying, ManualOverride, Idle],
            Classifying => vec![Capturing, Finalizing, ManualOverride, Idle],
            Finalizing => vec![Done, ManualOverride, Idle],
            ManualOverride => vec![Done, Idle],
            Done => vec![Idle, ManualOverride],
        }
    }
}
