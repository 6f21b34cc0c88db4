//! Image Classifier Port - Interface for the remote analysis service.
//!
//! Each capturable kind maps to one classification call that takes an image
//! and returns a single label from the kind's vocabulary.
//!
//! # Example
//!
//! ```ignore
//! struct AlwaysWarm;
//!
//! #[async_trait]
//! impl ImageClassifier for AlwaysWarm {
//!     async fn classify(
//!         &self,
//!         _kind: AnalysisKind,
//!         _image: &CapturedImage,
//!     ) -> Result<Classification, ClassifierError> {
//!         Ok(Classification::new(Label::new("Warm")))
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::analysis::{AnalysisKind, CapturedImage, Label};

/// Port for classifying a captured image.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Classify `image` for `kind`.
    ///
    /// Implementations do not apply fallbacks; the reconciler decides what a
    /// failure means for the run.
    async fn classify(
        &self,
        kind: AnalysisKind,
        image: &CapturedImage,
    ) -> Result<Classification, ClassifierError>;
}

/// Label plus optional confidence from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Classification {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Errors from a classification call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    /// Service returned a non-success status.
    #[error("classifier returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The kind has no classification endpoint.
    #[error("{0} cannot be classified from an image")]
    Unsupported(AnalysisKind),
}

impl ClassifierError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Whether the same image might succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ClassifierError::Network(_) | ClassifierError::Timeout { .. } => true,
            ClassifierError::Http { status, .. } => *status >= 500 || *status == 429,
            ClassifierError::Parse(_) | ClassifierError::Unsupported(_) => false,
        }
    }
}
