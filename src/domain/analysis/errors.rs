//! Analysis error taxonomy.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

use super::kind::AnalysisKind;

/// Errors raised by scoring, reconciliation and the session controller.
///
/// Only `InvalidInput` and a terminal upload `ClassificationFailure` are
/// meant for the user; the rest are handled inside the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("{kind} classification failed: {reason}")]
    ClassificationFailure { kind: AnalysisKind, reason: String },

    #[error("Discarded a {0} result from a superseded run")]
    StaleResult(AnalysisKind),

    #[error("{0} analysis is locked")]
    Locked(AnalysisKind),

    #[error("A {0} capture is already running")]
    CaptureInProgress(AnalysisKind),

    #[error("{0} is not captured from images")]
    NotCapturable(AnalysisKind),

    #[error("{0} is required and cannot be skipped")]
    MandatoryKind(AnalysisKind),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl AnalysisError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput(reason.into())
    }

    pub fn classification(kind: AnalysisKind, reason: impl Into<String>) -> Self {
        AnalysisError::ClassificationFailure {
            kind,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::InvalidInput(_) => ErrorCode::InvalidInput,
            AnalysisError::DeviceUnavailable(_) => ErrorCode::DeviceUnavailable,
            AnalysisError::ClassificationFailure { .. } => ErrorCode::ClassificationFailed,
            AnalysisError::StaleResult(_) => ErrorCode::StaleResult,
            AnalysisError::Locked(_) => ErrorCode::AnalysisLocked,
            AnalysisError::CaptureInProgress(_) => ErrorCode::CaptureInProgress,
            AnalysisError::NotCapturable(_) => ErrorCode::InvalidInput,
            AnalysisError::MandatoryKind(_) => ErrorCode::StepIncomplete,
            AnalysisError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
        }
    }

    pub fn is_user_visible(&self) -> bool {
        self.code().is_user_visible()
    }
}

impl From<ValidationError> for AnalysisError {
    fn from(err: ValidationError) -> Self {
        AnalysisError::InvalidInput(err.to_string())
    }
}

impl From<AnalysisError> for DomainError {
    fn from(err: AnalysisError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_become_invalid_input() {
        let err: AnalysisError = ValidationError::out_of_range("answers[2]", 1, 5, 9).into();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert!(err.to_string().contains("answers[2]"));
        assert!(err.is_user_visible());
    }

    #[test]
    fn recoverable_errors_stay_internal() {
        assert!(!AnalysisError::DeviceUnavailable("permission denied".into()).is_user_visible());
        assert!(!AnalysisError::StaleResult(AnalysisKind::SkinTone).is_user_visible());
    }

    #[test]
    fn messages_name_the_kind() {
        let err = AnalysisError::Locked(AnalysisKind::FaceShape);
        assert_eq!(err.to_string(), "Face Shape analysis is locked");
        let err = AnalysisError::classification(AnalysisKind::BodyShape, "HTTP 500");
        assert_eq!(err.to_string(), "Body Shape classification failed: HTTP 500");
    }
}
