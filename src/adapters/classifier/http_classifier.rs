//! HTTP Image Classifier - Implementation of ImageClassifier for the analysis backend.
//!
//! Posts the image as multipart field `file` to the kind's endpoint and reads
//! the label from the kind's response field. A response without that field
//! yields the `Unknown` label.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::adapters::backend_client::{error_detail, BackendClientConfig};
use crate::domain::analysis::{AnalysisKind, CapturedImage, Label};
use crate::ports::{Classification, ClassifierError, ImageClassifier};

/// Endpoint path for each capturable kind.
pub fn endpoint_path(kind: AnalysisKind) -> Option<&'static str> {
    match kind {
        AnalysisKind::SkinTone => Some("/analyze/skin-tone"),
        AnalysisKind::FaceShape => Some("/analyze/face"),
        AnalysisKind::BodyShape => Some("/analyze/body"),
        AnalysisKind::Personality => None,
    }
}

/// Response field holding the label.
pub fn response_field(kind: AnalysisKind) -> &'static str {
    kind.as_str()
}

/// Reads label and confidence out of a classifier response body.
pub fn parse_classification(kind: AnalysisKind, body: &Value) -> Classification {
    let label = body
        .get(response_field(kind))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(Label::new)
        .unwrap_or_else(Label::unknown);
    let confidence = body
        .get("confidence")
        .and_then(Value::as_f64)
        .map(|c| c as f32);
    Classification { label, confidence }
}

fn file_name(content_type: &str) -> String {
    match content_type {
        "image/jpeg" | "image/jpg" => "captured.jpg".to_string(),
        other => format!(
            "upload.{}",
            other.strip_prefix("image/").unwrap_or("bin")
        ),
    }
}

/// Classifier backed by the analysis service.
pub struct HttpImageClassifier {
    config: BackendClientConfig,
    client: Client,
}

impl HttpImageClassifier {
    pub fn new(config: BackendClientConfig) -> Result<Self, ClassifierError> {
        let client = config
            .build_client()
            .map_err(|e| ClassifierError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn map_send_error(&self, e: reqwest::Error) -> ClassifierError {
        if e.is_timeout() {
            ClassifierError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            ClassifierError::Network(format!("Connection failed: {}", e))
        } else {
            ClassifierError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(
        &self,
        kind: AnalysisKind,
        image: &CapturedImage,
    ) -> Result<Classification, ClassifierError> {
        let path = endpoint_path(kind).ok_or(ClassifierError::Unsupported(kind))?;

        let part = Part::bytes(image.bytes.clone())
            .file_name(file_name(&image.content_type))
            .mime_str(&image.content_type)
            .map_err(|e| ClassifierError::Parse(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let mut request = self.client.post(self.config.url(path)).multipart(form);
        if let Some(bearer) = self.config.bearer() {
            request = request.header("Authorization", bearer);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::http(
                status.as_u16(),
                error_detail(status.as_u16(), &body),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(format!("Failed to parse response: {}", e)))?;
        let classification = parse_classification(kind, &body);
        debug!(
            kind = kind.as_str(),
            label = %classification.label,
            confidence = ?classification.confidence,
            "Classifier responded"
        );
        Ok(classification)
    }
}
