//! AnalysisController - Owns the analysis sessions of one onboarding pass.
//!
//! Starts camera runs as cancellable background tasks, runs uploads inline,
//! records manual choices and questionnaire results, and reports completions
//! and skips to the [`OnboardingListener`]. At most one capture runs at a
//! time and the camera is held through a single-permit semaphore.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::reconcile::{AttemptSink, CaptureReconciler, CaptureSource, ReconciliationResult};
use crate::domain::analysis::{
    AcquisitionMethod, AnalysisError, AnalysisKind, AnalysisSession, AnalysisSnapshot,
    CaptureAttempt, CapturedImage, Gender, Label,
};
use crate::domain::foundation::Generation;
use crate::domain::onboarding::{AnalysisResults, OnboardingStep, ProfileUpdate};
use crate::domain::personality::{score, PersonalityCode};
use crate::ports::{CaptureDevice, OnboardingListener};

struct ControllerState {
    gender: Gender,
    sessions: HashMap<AnalysisKind, AnalysisSession>,
    personality: Option<PersonalityCode>,
    skipped: BTreeSet<AnalysisKind>,
}

impl ControllerState {
    fn new(gender: Gender, max_attempts: usize) -> Result<Self, AnalysisError> {
        let sessions = AnalysisKind::CAPTURABLE
            .iter()
            .map(|&kind| Ok((kind, AnalysisSession::new(kind, gender, max_attempts)?)))
            .collect::<Result<HashMap<_, _>, AnalysisError>>()?;
        Ok(Self {
            gender,
            sessions,
            personality: None,
            skipped: BTreeSet::new(),
        })
    }

    fn session(&self, kind: AnalysisKind) -> Result<&AnalysisSession, AnalysisError> {
        self.sessions
            .get(&kind)
            .ok_or(AnalysisError::NotCapturable(kind))
    }

    fn session_mut(&mut self, kind: AnalysisKind) -> Result<&mut AnalysisSession, AnalysisError> {
        self.sessions
            .get_mut(&kind)
            .ok_or(AnalysisError::NotCapturable(kind))
    }

    fn result(&self, kind: AnalysisKind) -> Option<String> {
        match kind {
            AnalysisKind::Personality => self.personality.as_ref().map(PersonalityCode::as_string),
            _ => self
                .sessions
                .get(&kind)
                .and_then(AnalysisSession::final_label)
                .map(Label::to_string),
        }
    }

    /// Manual skin tone locks automated face-shape analysis and clears it.
    fn apply_manual_lock(&mut self, kind: AnalysisKind) {
        if kind != AnalysisKind::SkinTone {
            return;
        }
        if let Some(face) = self.sessions.get_mut(&AnalysisKind::FaceShape) {
            if !face.is_locked() {
                warn!("Manual skin tone chosen; locking automated face shape analysis");
            }
            face.reset();
            face.lock();
        }
    }
}

struct ActiveCapture {
    kind: AnalysisKind,
    cancel: CancellationToken,
    /// Cancelled when the run exits, however it exits.
    finished: CancellationToken,
    /// `None` for uploads, which run on the caller's task.
    handle: Option<JoinHandle<()>>,
}

impl ActiveCapture {
    fn is_finished(&self) -> bool {
        self.cancel.is_cancelled() || self.finished.is_cancelled()
    }
}

/// Sink that writes into the controller's shared state.
struct ControllerSink {
    state: Arc<Mutex<ControllerState>>,
    kind: AnalysisKind,
    generation: Generation,
}

#[async_trait]
impl AttemptSink for ControllerSink {
    async fn begin_classifying(&mut self) -> Result<(), AnalysisError> {
        let mut state = self.state.lock().await;
        state
            .session_mut(self.kind)?
            .begin_classifying(self.generation)
    }

    async fn record(&mut self, attempt: CaptureAttempt) -> Result<Option<Label>, AnalysisError> {
        let mut state = self.state.lock().await;
        let session = state.session_mut(self.kind)?;
        let outcome = session.record_attempt(self.generation, attempt);
        if let Err(AnalysisError::StaleResult(_)) = &outcome {
            debug!(kind = self.kind.as_str(), "Discarded stale attempt");
        }
        outcome
    }
}

pub struct AnalysisController {
    state: Arc<Mutex<ControllerState>>,
    reconciler: Arc<CaptureReconciler>,
    device: Arc<dyn CaptureDevice>,
    camera: Arc<Semaphore>,
    active: Arc<Mutex<Option<ActiveCapture>>>,
    listener: Arc<dyn OnboardingListener>,
}

impl AnalysisController {
    pub fn new(
        gender: Gender,
        reconciler: Arc<CaptureReconciler>,
        device: Arc<dyn CaptureDevice>,
        listener: Arc<dyn OnboardingListener>,
    ) -> Result<Self, AnalysisError> {
        let state = ControllerState::new(gender, reconciler.config().max_attempts)?;
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            reconciler,
            device,
            camera: Arc::new(Semaphore::new(1)),
            active: Arc::new(Mutex::new(None)),
            listener,
        })
    }

    pub async fn gender(&self) -> Gender {
        self.state.lock().await.gender
    }

    /// Starts a camera run in the background.
    ///
    /// # Errors
    ///
    /// - `CaptureInProgress` while any capture is running
    /// - `Locked` for a locked kind
    /// - `NotCapturable` for personality
    pub async fn start_camera(&self, kind: AnalysisKind) -> Result<Generation, AnalysisError> {
        let mut active = self.active.lock().await;
        self.reap(&mut active).await;
        if let Some(current) = active.as_ref() {
            return Err(AnalysisError::CaptureInProgress(current.kind));
        }
        let permit = Arc::clone(&self.camera)
            .try_acquire_owned()
            .map_err(|_| AnalysisError::CaptureInProgress(kind))?;

        let (generation, gender) = {
            let mut state = self.state.lock().await;
            let gender = state.gender;
            (state.session_mut(kind)?.begin(AcquisitionMethod::Camera)?, gender)
        };

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let finished = CancellationToken::new();
        let task_finished = finished.clone();
        let reconciler = Arc::clone(&self.reconciler);
        let device = Arc::clone(&self.device);
        let state = Arc::clone(&self.state);
        let listener = Arc::clone(&self.listener);

        let handle = tokio::spawn(async move {
            let _finished = task_finished.drop_guard();
            let mut sink = ControllerSink {
                state: Arc::clone(&state),
                kind,
                generation,
            };
            let outcome = reconciler
                .reconcile(
                    kind,
                    gender,
                    CaptureSource::Camera(device),
                    &mut sink,
                    &task_cancel,
                )
                .await;
            drop(permit);

            match outcome {
                Ok(result) => listener.on_complete(kind, result.label.as_str()),
                Err(AnalysisError::DeviceUnavailable(reason)) => {
                    let mut state = state.lock().await;
                    if let Ok(session) = state.session_mut(kind) {
                        if session.generation() == generation {
                            info!(kind = kind.as_str(), reason = %reason, "Switching to manual input");
                            session.enter_manual();
                        }
                    }
                }
                Err(AnalysisError::StaleResult(_)) => {
                    debug!(kind = kind.as_str(), "Camera run superseded");
                }
                Err(e) => warn!(kind = kind.as_str(), error = %e, "Camera run ended"),
            }
        });

        info!(kind = kind.as_str(), %generation, "Camera run scheduled");
        *active = Some(ActiveCapture {
            kind,
            cancel,
            finished,
            handle: Some(handle),
        });
        Ok(generation)
    }

    /// Classifies an uploaded image and waits for the result.
    ///
    /// A failed classification returns the session to idle and is returned
    /// to the caller as `ClassificationFailure`.
    pub async fn analyze_upload(
        &self,
        kind: AnalysisKind,
        image: CapturedImage,
    ) -> Result<Label, AnalysisError> {
        if !image.is_image() {
            return Err(AnalysisError::invalid_input(format!(
                "expected an image upload, got '{}'",
                image.content_type
            )));
        }

        let cancel = CancellationToken::new();
        let (generation, gender) = {
            let mut active = self.active.lock().await;
            self.reap(&mut active).await;
            if let Some(current) = active.as_ref() {
                return Err(AnalysisError::CaptureInProgress(current.kind));
            }
            let mut state = self.state.lock().await;
            let gender = state.gender;
            let generation = state.session_mut(kind)?.begin(AcquisitionMethod::Upload)?;
            *active = Some(ActiveCapture {
                kind,
                cancel: cancel.clone(),
                finished: cancel.clone(),
                handle: None,
            });
            (generation, gender)
        };
        // Marks the upload finished on return or when the caller drops this future.
        let _done = cancel.clone().drop_guard();

        let mut sink = ControllerSink {
            state: Arc::clone(&self.state),
            kind,
            generation,
        };
        let outcome = self
            .reconciler
            .reconcile(kind, gender, CaptureSource::Upload(image), &mut sink, &cancel)
            .await;

        match outcome {
            Ok(ReconciliationResult { label, .. }) => {
                self.listener.on_complete(kind, label.as_str());
                Ok(label)
            }
            Err(AnalysisError::ClassificationFailure { kind, reason }) => {
                let mut state = self.state.lock().await;
                if let Err(e) = state.session_mut(kind)?.fail_upload(generation, reason.clone()) {
                    debug!(kind = kind.as_str(), error = %e, "Upload failure arrived after reset");
                }
                Err(AnalysisError::ClassificationFailure { kind, reason })
            }
            Err(e) => Err(e),
        }
    }

    /// Abandons automated capture for `kind` and waits for a manual choice.
    pub async fn choose_manually(&self, kind: AnalysisKind) -> Result<(), AnalysisError> {
        self.cancel_for(&Self::affected_by_manual(kind)).await;
        let mut state = self.state.lock().await;
        state.session_mut(kind)?.enter_manual();
        state.apply_manual_lock(kind);
        Ok(())
    }

    /// Records the manual choice after [`choose_manually`](Self::choose_manually).
    pub async fn select_manual(
        &self,
        kind: AnalysisKind,
        label: Label,
    ) -> Result<Label, AnalysisError> {
        let label = {
            let mut state = self.state.lock().await;
            state.session_mut(kind)?.select_manual(label)?
        };
        self.listener.on_complete(kind, label.as_str());
        Ok(label)
    }

    /// Jumps `kind` straight to `Done` with `label`, discarding partial attempts.
    pub async fn manual_override(
        &self,
        kind: AnalysisKind,
        label: Label,
    ) -> Result<Label, AnalysisError> {
        {
            let state = self.state.lock().await;
            let session = state.session(kind)?;
            if !kind.accepts(&label, session.gender()) {
                return Err(AnalysisError::invalid_input(format!(
                    "'{}' is not a valid {} choice",
                    label, kind
                )));
            }
        }
        self.cancel_for(&Self::affected_by_manual(kind)).await;

        let label = {
            let mut state = self.state.lock().await;
            let label = state.session_mut(kind)?.manual_override(label)?;
            state.apply_manual_lock(kind);
            label
        };
        info!(kind = kind.as_str(), label = %label, "Manual override");
        self.listener.on_complete(kind, label.as_str());
        Ok(label)
    }

    /// Restarts `kind` from idle. A lock survives the reset.
    pub async fn reset(&self, kind: AnalysisKind) -> Result<(), AnalysisError> {
        self.cancel_for(&[kind]).await;
        let mut state = self.state.lock().await;
        state.skipped.remove(&kind);
        match kind {
            AnalysisKind::Personality => state.personality = None,
            _ => state.session_mut(kind)?.reset(),
        }
        debug!(kind = kind.as_str(), "Analysis reset");
        Ok(())
    }

    /// Skips an optional kind.
    pub async fn skip(&self, kind: AnalysisKind) -> Result<(), AnalysisError> {
        if kind.is_mandatory() {
            return Err(AnalysisError::MandatoryKind(kind));
        }
        self.cancel_for(&[kind]).await;
        {
            let mut state = self.state.lock().await;
            match kind {
                AnalysisKind::Personality => state.personality = None,
                _ => state.session_mut(kind)?.reset(),
            }
            state.skipped.insert(kind);
        }
        info!(kind = kind.as_str(), "Analysis skipped");
        self.listener.on_skip(kind);
        Ok(())
    }

    /// Scores the questionnaire answers and records the code.
    pub async fn record_personality(
        &self,
        answers: &[u8],
    ) -> Result<PersonalityCode, AnalysisError> {
        let code = score(answers)?;
        {
            let mut state = self.state.lock().await;
            state.personality = Some(code.clone());
            state.skipped.remove(&AnalysisKind::Personality);
        }
        self.listener
            .on_complete(AnalysisKind::Personality, &code.as_string());
        Ok(code)
    }

    pub async fn result(&self, kind: AnalysisKind) -> Option<String> {
        self.state.lock().await.result(kind)
    }

    /// Kinds with a result.
    pub async fn completion_set(&self) -> BTreeSet<AnalysisKind> {
        let state = self.state.lock().await;
        [
            AnalysisKind::SkinTone,
            AnalysisKind::FaceShape,
            AnalysisKind::BodyShape,
            AnalysisKind::Personality,
        ]
        .into_iter()
        .filter(|&kind| state.result(kind).is_some())
        .collect()
    }

    pub async fn skipped(&self) -> BTreeSet<AnalysisKind> {
        self.state.lock().await.skipped.clone()
    }

    /// Fails with `MandatoryKind` naming the first required kind without a result.
    pub async fn ensure_can_advance(&self, step: OnboardingStep) -> Result<(), AnalysisError> {
        let state = self.state.lock().await;
        match step.required_kinds().find(|&kind| state.result(kind).is_none()) {
            Some(kind) => Err(AnalysisError::MandatoryKind(kind)),
            None => Ok(()),
        }
    }

    pub async fn can_advance(&self, step: OnboardingStep) -> bool {
        self.ensure_can_advance(step).await.is_ok()
    }

    pub async fn snapshot(&self, kind: AnalysisKind) -> Result<AnalysisSnapshot, AnalysisError> {
        Ok(self.state.lock().await.session(kind)?.snapshot())
    }

    pub async fn attempts(&self, kind: AnalysisKind) -> Result<usize, AnalysisError> {
        Ok(self.state.lock().await.session(kind)?.attempts().len())
    }

    /// Partial profile record: completed kinds set, skipped ones null.
    pub async fn assemble_profile_update(&self) -> ProfileUpdate {
        let state = self.state.lock().await;
        let label = |kind: AnalysisKind| {
            state
                .sessions
                .get(&kind)
                .and_then(AnalysisSession::final_label)
                .cloned()
        };
        ProfileUpdate::with_results(AnalysisResults {
            skin_tone: label(AnalysisKind::SkinTone),
            face_shape: label(AnalysisKind::FaceShape),
            body_shape: label(AnalysisKind::BodyShape),
            personality: state.personality.clone(),
        })
    }

    pub async fn is_capturing(&self) -> bool {
        let mut active = self.active.lock().await;
        self.reap(&mut active).await;
        active.is_some()
    }

    /// Waits for the running capture, if any, to finish on its own.
    pub async fn wait_idle(&self) {
        let finished = {
            let active = self.active.lock().await;
            active.as_ref().map(|a| a.finished.clone())
        };
        if let Some(finished) = finished {
            finished.cancelled().await;
        }
        let mut active = self.active.lock().await;
        self.reap(&mut active).await;
    }

    /// Cancels every capture and releases the camera.
    pub async fn shutdown(&self) {
        self.cancel_for(&AnalysisKind::CAPTURABLE).await;
    }

    fn affected_by_manual(kind: AnalysisKind) -> Vec<AnalysisKind> {
        if kind == AnalysisKind::SkinTone {
            vec![AnalysisKind::SkinTone, AnalysisKind::FaceShape]
        } else {
            vec![kind]
        }
    }

    /// Clears a finished capture. A session its run left mid-capture is
    /// returned to idle with a fresh generation.
    async fn reap(&self, active: &mut Option<ActiveCapture>) {
        let kind = match active.as_ref() {
            Some(current) if current.is_finished() => current.kind,
            _ => return,
        };
        *active = None;

        let mut state = self.state.lock().await;
        if let Ok(session) = state.session_mut(kind) {
            if session.phase().is_active() {
                warn!(kind = kind.as_str(), phase = ?session.phase(), "Capture abandoned mid-run, resetting session");
                session.reset();
            }
        }
    }

    /// Cancels the running capture if it belongs to one of `kinds` and waits
    /// for its task so the camera is released before returning.
    async fn cancel_for(&self, kinds: &[AnalysisKind]) {
        let taken = {
            let mut active = self.active.lock().await;
            match active.as_ref() {
                Some(current) if kinds.contains(&current.kind) => active.take(),
                _ => None,
            }
        };
        let Some(capture) = taken else { return };

        capture.cancel.cancel();
        if let Some(handle) = capture.handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Capture task failed to join");
            }
        }
        debug!(kind = capture.kind.as_str(), "Capture cancelled");
    }
}

impl Drop for AnalysisController {
    fn drop(&mut self) {
        if let Ok(mut active) = self.active.try_lock() {
            if let Some(capture) = active.take() {
                capture.cancel.cancel();
                if let Some(handle) = capture.handle {
                    handle.abort();
                }
            }
        }
    }
}
