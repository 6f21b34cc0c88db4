//! Onboarding flow errors.

use thiserror::Error;

use crate::domain::analysis::{AnalysisError, AnalysisKind};
use crate::domain::foundation::{DomainError, ErrorCode};

use super::step::OnboardingStep;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OnboardingError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("{kind} is required before leaving {step}")]
    StepIncomplete {
        step: OnboardingStep,
        kind: AnalysisKind,
    },

    #[error("Cannot move from {from} to {to}")]
    InvalidStep {
        from: OnboardingStep,
        to: OnboardingStep,
    },

    #[error("No signed-in profile")]
    NotSignedIn,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl OnboardingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OnboardingError::MissingField(_) => ErrorCode::ValidationFailed,
            OnboardingError::StepIncomplete { .. } => ErrorCode::StepIncomplete,
            OnboardingError::InvalidStep { .. } => ErrorCode::InvalidStateTransition,
            OnboardingError::NotSignedIn => ErrorCode::InvalidStateTransition,
            OnboardingError::Analysis(e) => e.code(),
        }
    }
}

impl From<OnboardingError> for DomainError {
    fn from(err: OnboardingError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
