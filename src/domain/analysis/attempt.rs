//! Captured images and the attempts they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::label::Label;

/// Raw image bytes plus their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
            captured_at: Utc::now(),
        }
    }

    /// Frame grabbed from a camera stream.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg")
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where an attempt's label came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum LabelSource {
    Classifier { confidence: Option<f32> },
    /// Classification failed; the kind's default was substituted.
    Fallback,
}

/// One capture + classification step.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureAttempt {
    pub image: CapturedImage,
    pub label: Label,
    pub source: LabelSource,
}

impl CaptureAttempt {
    pub fn classified(image: CapturedImage, label: Label, confidence: Option<f32>) -> Self {
        Self {
            image,
            label,
            source: LabelSource::Classifier { confidence },
        }
    }

    pub fn fallback(image: CapturedImage, label: Label) -> Self {
        Self {
            image,
            label,
            source: LabelSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, LabelSource::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_content_type_check() {
        assert!(CapturedImage::jpeg(vec![1, 2]).is_image());
        assert!(CapturedImage::new(vec![1], "image/png").is_image());
        assert!(!CapturedImage::new(vec![1], "application/pdf").is_image());
    }

    #[test]
    fn fallback_attempt_is_flagged() {
        let attempt = CaptureAttempt::fallback(CapturedImage::jpeg(vec![]), Label::new("Oval"));
        assert!(attempt.is_fallback());
        let attempt =
            CaptureAttempt::classified(CapturedImage::jpeg(vec![]), Label::new("Round"), Some(0.8));
        assert!(!attempt.is_fallback());
    }
}
