//! CaptureReconciler - Drives capture/classify attempts and votes on the result.
//!
//! A camera run waits the capture interval, grabs a frame and classifies it,
//! repeating until the session has `max_attempts` attempts. An upload run
//! classifies its single image once. Every step is raced against the run's
//! cancellation token, and every write goes through an [`AttemptSink`] that
//! rejects results from superseded runs.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{BackendConfig, CaptureConfig};
use crate::domain::analysis::{
    AnalysisError, AnalysisKind, AnalysisSession, CaptureAttempt, CapturedImage, Gender, Label,
};
use crate::domain::foundation::Generation;
use crate::ports::{
    CaptureDevice, CaptureError, CaptureStream, Classification, ClassifierError, ImageClassifier,
};

/// Reconciler timing and vote size.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub max_attempts: usize,
    /// Wait before each camera attempt.
    pub capture_interval: Duration,
    /// Bound on a single classifier call; expiry counts as a failure.
    pub classify_timeout: Duration,
}

impl ReconcilerConfig {
    pub fn from_config(capture: &CaptureConfig, backend: &BackendConfig) -> Self {
        Self {
            max_attempts: capture.max_attempts,
            capture_interval: capture.interval(),
            classify_timeout: backend.timeout(),
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            capture_interval: Duration::from_secs(2),
            classify_timeout: Duration::from_secs(15),
        }
    }
}

/// Where a run gets its images.
#[derive(Clone)]
pub enum CaptureSource {
    Camera(Arc<dyn CaptureDevice>),
    Upload(CapturedImage),
}

/// Generation-checked writes into the owning session.
#[async_trait]
pub trait AttemptSink: Send {
    async fn begin_classifying(&mut self) -> Result<(), AnalysisError>;

    /// Returns the voted label once the session has finalized.
    async fn record(&mut self, attempt: CaptureAttempt) -> Result<Option<Label>, AnalysisError>;
}

/// Sink writing straight into a session the caller owns.
pub struct SessionSink<'a> {
    session: &'a mut AnalysisSession,
    generation: Generation,
}

impl<'a> SessionSink<'a> {
    pub fn new(session: &'a mut AnalysisSession, generation: Generation) -> Self {
        Self {
            session,
            generation,
        }
    }
}

#[async_trait]
impl AttemptSink for SessionSink<'_> {
    async fn begin_classifying(&mut self) -> Result<(), AnalysisError> {
        self.session.begin_classifying(self.generation)
    }

    async fn record(&mut self, attempt: CaptureAttempt) -> Result<Option<Label>, AnalysisError> {
        self.session.record_attempt(self.generation, attempt)
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationResult {
    pub kind: AnalysisKind,
    pub label: Label,
    pub attempts: usize,
    /// Attempts that used the kind's default label.
    pub fallbacks: usize,
}

/// Stops the stream on every exit path, including task abort.
struct StreamGuard(Box<dyn CaptureStream>);

impl StreamGuard {
    async fn grab_frame(&mut self) -> Result<CapturedImage, CaptureError> {
        self.0.grab_frame().await
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if self.0.is_active() {
            self.0.stop();
            debug!("Capture stream released");
        }
    }
}

pub struct CaptureReconciler {
    classifier: Arc<dyn ImageClassifier>,
    config: ReconcilerConfig,
}

impl CaptureReconciler {
    pub fn new(classifier: Arc<dyn ImageClassifier>, config: ReconcilerConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Runs one capture session to completion.
    ///
    /// # Errors
    ///
    /// - `DeviceUnavailable` when the camera cannot be opened
    /// - `ClassificationFailure` when an upload's only classification fails
    /// - `InvalidInput` when an upload is not an image
    /// - `StaleResult` when the run is cancelled or superseded
    pub async fn reconcile(
        &self,
        kind: AnalysisKind,
        gender: Gender,
        source: CaptureSource,
        sink: &mut dyn AttemptSink,
        cancel: &CancellationToken,
    ) -> Result<ReconciliationResult, AnalysisError> {
        let fallback = kind
            .fallback_label(gender)
            .ok_or(AnalysisError::NotCapturable(kind))?;

        match source {
            CaptureSource::Camera(device) => {
                self.run_camera(kind, fallback, device.as_ref(), sink, cancel)
                    .await
            }
            CaptureSource::Upload(image) => self.run_upload(kind, image, sink, cancel).await,
        }
    }

    async fn run_camera(
        &self,
        kind: AnalysisKind,
        fallback: Label,
        device: &dyn CaptureDevice,
        sink: &mut dyn AttemptSink,
        cancel: &CancellationToken,
    ) -> Result<ReconciliationResult, AnalysisError> {
        let stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalysisError::StaleResult(kind)),
            acquired = device.acquire() => acquired.map_err(|e| {
                warn!(kind = kind.as_str(), error = %e, "Camera unavailable");
                AnalysisError::DeviceUnavailable(e.to_string())
            })?,
        };
        let mut stream = StreamGuard(stream);
        info!(kind = kind.as_str(), "Camera capture started");

        let mut fallbacks = 0;
        for attempt_no in 1..=self.config.max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AnalysisError::StaleResult(kind)),
                _ = sleep(self.config.capture_interval) => {}
            }

            let frame = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AnalysisError::StaleResult(kind)),
                frame = stream.grab_frame() => frame,
            };
            sink.begin_classifying().await?;

            let attempt = match frame {
                Ok(image) => match self.classify(kind, &image, cancel).await {
                    None => return Err(AnalysisError::StaleResult(kind)),
                    Some(Ok(c)) => CaptureAttempt::classified(image, c.label, c.confidence),
                    Some(Err(e)) => {
                        warn!(kind = kind.as_str(), attempt_no, transient = e.is_transient(), error = %e, "Classification failed, using default label");
                        fallbacks += 1;
                        CaptureAttempt::fallback(image, fallback.clone())
                    }
                },
                Err(e) => {
                    warn!(kind = kind.as_str(), attempt_no, error = %e, "Frame capture failed, using default label");
                    fallbacks += 1;
                    CaptureAttempt::fallback(CapturedImage::jpeg(Vec::new()), fallback.clone())
                }
            };
            debug!(kind = kind.as_str(), attempt_no, label = %attempt.label, "Attempt recorded");

            if let Some(label) = sink.record(attempt).await? {
                info!(kind = kind.as_str(), label = %label, fallbacks, "Camera analysis finalized");
                return Ok(ReconciliationResult {
                    kind,
                    label,
                    attempts: attempt_no,
                    fallbacks,
                });
            }
        }

        Err(AnalysisError::InvalidTransition(format!(
            "{} run ended without a result",
            kind
        )))
    }

    async fn run_upload(
        &self,
        kind: AnalysisKind,
        image: CapturedImage,
        sink: &mut dyn AttemptSink,
        cancel: &CancellationToken,
    ) -> Result<ReconciliationResult, AnalysisError> {
        if !image.is_image() {
            return Err(AnalysisError::invalid_input(format!(
                "expected an image upload, got '{}'",
                image.content_type
            )));
        }

        sink.begin_classifying().await?;
        let classification = match self.classify(kind, &image, cancel).await {
            None => return Err(AnalysisError::StaleResult(kind)),
            Some(Ok(c)) => c,
            Some(Err(e)) => {
                warn!(kind = kind.as_str(), transient = e.is_transient(), error = %e, "Upload classification failed");
                return Err(AnalysisError::classification(kind, e.to_string()));
            }
        };

        let attempt =
            CaptureAttempt::classified(image, classification.label, classification.confidence);
        let label = sink.record(attempt).await?.ok_or_else(|| {
            AnalysisError::InvalidTransition(format!("{} upload did not finalize", kind))
        })?;
        info!(kind = kind.as_str(), label = %label, "Upload analysis finalized");
        Ok(ReconciliationResult {
            kind,
            label,
            attempts: 1,
            fallbacks: 0,
        })
    }

    /// `None` when cancelled; a timeout becomes `ClassifierError::Timeout`.
    async fn classify(
        &self,
        kind: AnalysisKind,
        image: &CapturedImage,
        cancel: &CancellationToken,
    ) -> Option<Result<Classification, ClassifierError>> {
        let limit = self.config.classify_timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = timeout(limit, self.classifier.classify(kind, image)) => {
                Some(outcome.unwrap_or_else(|_| Err(ClassifierError::Timeout {
                    timeout_secs: limit.as_secs(),
                })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockImageClassifier, ScriptedCaptureDevice};
    use crate::domain::analysis::{AcquisitionMethod, AnalysisPhase};

    fn reconciler(classifier: MockImageClassifier) -> CaptureReconciler {
        CaptureReconciler::new(Arc::new(classifier), ReconcilerConfig::default())
    }

    fn session(kind: AnalysisKind) -> AnalysisSession {
        AnalysisSession::new(kind, Gender::Female, 3).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn camera_run_votes_over_three_attempts() {
        let classifier = MockImageClassifier::new()
            .with_label("Cool")
            .with_label("Warm")
            .with_label("Cool");
        let device = Arc::new(ScriptedCaptureDevice::new());
        let mut s = session(AnalysisKind::SkinTone);
        let gen = s.begin(AcquisitionMethod::Camera).unwrap();

        let started = tokio::time::Instant::now();
        let result = reconciler(classifier.clone())
            .reconcile(
                AnalysisKind::SkinTone,
                Gender::Female,
                CaptureSource::Camera(device.clone()),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.label, Label::new("Cool"));
        assert_eq!(result.attempts, 3);
        assert_eq!(result.fallbacks, 0);
        assert_eq!(classifier.call_count(), 3);
        assert!(started.elapsed() >= Duration::from_secs(6));
        assert_eq!(s.phase(), AnalysisPhase::Done);
        assert_eq!(device.active_tracks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_classifications_use_default_label() {
        let classifier = MockImageClassifier::new()
            .with_error(ClassifierError::http(500, "boom"))
            .with_error(ClassifierError::Network("reset".into()))
            .with_error(ClassifierError::Parse("eof".into()));
        let device = Arc::new(ScriptedCaptureDevice::new());
        let mut s = AnalysisSession::new(AnalysisKind::BodyShape, Gender::Male, 3).unwrap();
        let gen = s.begin(AcquisitionMethod::Camera).unwrap();

        let result = reconciler(classifier)
            .reconcile(
                AnalysisKind::BodyShape,
                Gender::Male,
                CaptureSource::Camera(device.clone()),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.label, Label::new("Mesomorph"));
        assert_eq!(result.fallbacks, 3);
        assert!(s.attempts().iter().all(CaptureAttempt::is_fallback));
        assert_eq!(device.active_tracks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_classifier_times_out_into_fallback() {
        let classifier = MockImageClassifier::new()
            .with_label("Round")
            .with_delay(Duration::from_secs(60));
        let config = ReconcilerConfig {
            max_attempts: 1,
            ..ReconcilerConfig::default()
        };
        let mut single = AnalysisSession::new(AnalysisKind::FaceShape, Gender::Female, 1).unwrap();
        let single_gen = single.begin(AcquisitionMethod::Camera).unwrap();

        let result = CaptureReconciler::new(Arc::new(classifier), config)
            .reconcile(
                AnalysisKind::FaceShape,
                Gender::Female,
                CaptureSource::Camera(Arc::new(ScriptedCaptureDevice::new())),
                &mut SessionSink::new(&mut single, single_gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.label, Label::new("Oval"));
        assert_eq!(result.fallbacks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_failure_counts_as_failed_attempt() {
        let device = Arc::new(
            ScriptedCaptureDevice::new().with_frame_error(CaptureError::FrameFailed("dark".into())),
        );
        let classifier = MockImageClassifier::new().with_label("Cool").with_label("Cool");
        let mut s = session(AnalysisKind::SkinTone);
        let gen = s.begin(AcquisitionMethod::Camera).unwrap();

        let result = reconciler(classifier.clone())
            .reconcile(
                AnalysisKind::SkinTone,
                Gender::Female,
                CaptureSource::Camera(device),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.fallbacks, 1);
        assert_eq!(classifier.call_count(), 2);
        assert_eq!(result.label, Label::new("Cool"));
    }

    #[tokio::test]
    async fn denied_camera_is_device_unavailable() {
        let device = Arc::new(ScriptedCaptureDevice::denied());
        let mut s = session(AnalysisKind::SkinTone);
        let gen = s.begin(AcquisitionMethod::Camera).unwrap();

        let err = reconciler(MockImageClassifier::new())
            .reconcile(
                AnalysisKind::SkinTone,
                Gender::Female,
                CaptureSource::Camera(device.clone()),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::DeviceUnavailable(_)));
        assert_eq!(device.active_tracks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_releases_camera() {
        let device = Arc::new(ScriptedCaptureDevice::new());
        let classifier = MockImageClassifier::new().with_delay(Duration::from_secs(5));
        let reconciler = Arc::new(reconciler(classifier));
        let cancel = CancellationToken::new();

        let task = {
            let device = device.clone();
            let reconciler = reconciler.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut s = AnalysisSession::new(AnalysisKind::SkinTone, Gender::Female, 3)?;
                let gen = s.begin(AcquisitionMethod::Camera)?;
                reconciler
                    .reconcile(
                        AnalysisKind::SkinTone,
                        Gender::Female,
                        CaptureSource::Camera(device),
                        &mut SessionSink::new(&mut s, gen),
                        &cancel,
                    )
                    .await
            })
        };

        sleep(Duration::from_secs(3)).await;
        assert_eq!(device.active_tracks(), 1);
        cancel.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err, AnalysisError::StaleResult(AnalysisKind::SkinTone));
        assert_eq!(device.active_tracks(), 0);
    }

    #[tokio::test]
    async fn upload_finalizes_after_single_classification() {
        let classifier = MockImageClassifier::new().with_label("Heart");
        let mut s = session(AnalysisKind::FaceShape);
        let gen = s.begin(AcquisitionMethod::Upload).unwrap();

        let result = reconciler(classifier.clone())
            .reconcile(
                AnalysisKind::FaceShape,
                Gender::Female,
                CaptureSource::Upload(CapturedImage::new(vec![1, 2, 3], "image/png")),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.label, Label::new("Heart"));
        assert_eq!(result.attempts, 1);
        assert_eq!(classifier.call_count(), 1);
        assert_eq!(s.final_label(), Some(&Label::new("Heart")));
    }

    #[tokio::test]
    async fn upload_failure_is_terminal() {
        let classifier = MockImageClassifier::new().with_error(ClassifierError::http(502, "down"));
        let mut s = session(AnalysisKind::SkinTone);
        let gen = s.begin(AcquisitionMethod::Upload).unwrap();

        let err = reconciler(classifier.clone())
            .reconcile(
                AnalysisKind::SkinTone,
                Gender::Female,
                CaptureSource::Upload(CapturedImage::jpeg(vec![1])),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::ClassificationFailure { .. }));
        assert!(err.is_user_visible());
        assert_eq!(classifier.call_count(), 1);
        assert!(!s.is_complete());
    }

    #[tokio::test]
    async fn non_image_upload_is_invalid_input() {
        let classifier = MockImageClassifier::new();
        let mut s = session(AnalysisKind::SkinTone);
        let gen = s.begin(AcquisitionMethod::Upload).unwrap();

        let err = reconciler(classifier.clone())
            .reconcile(
                AnalysisKind::SkinTone,
                Gender::Female,
                CaptureSource::Upload(CapturedImage::new(vec![1], "text/plain")),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidInput(_)));
        assert_eq!(classifier.call_count(), 0);
    }

    #[tokio::test]
    async fn stale_sink_stops_the_run() {
        let mut s = session(AnalysisKind::SkinTone);
        let old = s.begin(AcquisitionMethod::Upload).unwrap();
        s.reset();
        s.begin(AcquisitionMethod::Upload).unwrap();

        let err = reconciler(MockImageClassifier::new().with_label("Warm"))
            .reconcile(
                AnalysisKind::SkinTone,
                Gender::Female,
                CaptureSource::Upload(CapturedImage::jpeg(vec![1])),
                &mut SessionSink::new(&mut s, old),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, AnalysisError::StaleResult(AnalysisKind::SkinTone));
        assert!(s.attempts().is_empty());
    }

    #[tokio::test]
    async fn personality_cannot_be_reconciled() {
        let mut s = session(AnalysisKind::SkinTone);
        let gen = s.generation();
        let err = reconciler(MockImageClassifier::new())
            .reconcile(
                AnalysisKind::Personality,
                Gender::Female,
                CaptureSource::Upload(CapturedImage::jpeg(vec![1])),
                &mut SessionSink::new(&mut s, gen),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::NotCapturable(AnalysisKind::Personality));
    }
}
