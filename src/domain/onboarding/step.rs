//! Onboarding steps.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::analysis::AnalysisKind;
use crate::domain::foundation::StateMachine;

/// Screens of the onboarding flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Login,
    BasicInfo,
    SkinFaceAnalysis,
    BodyAnalysis,
    PersonalityAnalysis,
    Complete,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 6] = [
        OnboardingStep::Login,
        OnboardingStep::BasicInfo,
        OnboardingStep::SkinFaceAnalysis,
        OnboardingStep::BodyAnalysis,
        OnboardingStep::PersonalityAnalysis,
        OnboardingStep::Complete,
    ];

    pub fn index(&self) -> usize {
        match self {
            OnboardingStep::Login => 0,
            OnboardingStep::BasicInfo => 1,
            OnboardingStep::SkinFaceAnalysis => 2,
            OnboardingStep::BodyAnalysis => 3,
            OnboardingStep::PersonalityAnalysis => 4,
            OnboardingStep::Complete => 5,
        }
    }

    /// The step reached by "continue".
    pub fn next(&self) -> Option<OnboardingStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The step reached by "back", where the flow offers one.
    pub fn previous(&self) -> Option<OnboardingStep> {
        match self {
            OnboardingStep::SkinFaceAnalysis => Some(OnboardingStep::BasicInfo),
            OnboardingStep::BodyAnalysis => Some(OnboardingStep::SkinFaceAnalysis),
            _ => None,
        }
    }

    /// Kinds analysed on this step.
    pub fn analysis_kinds(&self) -> &'static [AnalysisKind] {
        match self {
            OnboardingStep::SkinFaceAnalysis => &[AnalysisKind::SkinTone, AnalysisKind::FaceShape],
            OnboardingStep::BodyAnalysis => &[AnalysisKind::BodyShape],
            OnboardingStep::PersonalityAnalysis => &[AnalysisKind::Personality],
            _ => &[],
        }
    }

    pub fn is_analysis(&self) -> bool {
        !self.analysis_kinds().is_empty()
    }

    /// Kinds that must have a result before leaving this step.
    pub fn required_kinds(&self) -> impl Iterator<Item = AnalysisKind> {
        self.analysis_kinds()
            .iter()
            .copied()
            .filter(AnalysisKind::is_mandatory)
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OnboardingStep::Login => "login",
            OnboardingStep::BasicInfo => "basic_info",
            OnboardingStep::SkinFaceAnalysis => "skin_face_analysis",
            OnboardingStep::BodyAnalysis => "body_analysis",
            OnboardingStep::PersonalityAnalysis => "personality_analysis",
            OnboardingStep::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}

impl StateMachine for OnboardingStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.next().as_ref() == Some(target) || self.previous().as_ref() == Some(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        self.next().into_iter().chain(self.previous()).collect()
    }
}
