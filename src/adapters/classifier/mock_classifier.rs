//! Mock Image Classifier for testing.
//!
//! Returns queued responses in order, optionally after a delay, and records
//! every call. When the queue is empty it answers with the kind's first
//! vocabulary entry.
//!
//! # Example
//!
//! ```ignore
//! let classifier = MockImageClassifier::new()
//!     .with_label("Cool")
//!     .with_error(ClassifierError::Network("reset".into()))
//!     .with_delay(Duration::from_millis(50));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::analysis::{AnalysisKind, CapturedImage, Gender, Label};
use crate::ports::{Classification, ClassifierError, ImageClassifier};

#[derive(Debug, Clone)]
enum MockResponse {
    Success(Classification),
    Error(ClassifierError),
}

#[derive(Debug, Clone)]
pub struct MockImageClassifier {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<AnalysisKind>>>,
}

impl Default for MockImageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockImageClassifier {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful label.
    pub fn with_label(self, label: &str) -> Self {
        self.push(MockResponse::Success(Classification::new(Label::new(label))))
    }

    /// Queues a full classification.
    pub fn with_classification(self, classification: Classification) -> Self {
        self.push(MockResponse::Success(classification))
    }

    /// Queues an error.
    pub fn with_error(self, error: ClassifierError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<AnalysisKind> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    fn next_response(&self, kind: AnalysisKind) -> MockResponse {
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            let label = kind
                .choices(Gender::Female)
                .first()
                .copied()
                .unwrap_or(Label::UNKNOWN);
            MockResponse::Success(Classification::new(Label::new(label)))
        })
    }
}

#[async_trait]
impl ImageClassifier for MockImageClassifier {
    async fn classify(
        &self,
        kind: AnalysisKind,
        _image: &CapturedImage,
    ) -> Result<Classification, ClassifierError> {
        self.calls.lock().unwrap().push(kind);
        let response = self.next_response(kind);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match response {
            MockResponse::Success(c) => Ok(c),
            MockResponse::Error(e) => Err(e),
        }
    }
}
