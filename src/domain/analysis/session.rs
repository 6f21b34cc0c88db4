//! Analysis session aggregate.
//!
//! One session exists per capturable kind for the current onboarding pass.
//! Every run (camera, upload or manual) is stamped with a [`Generation`];
//! results carrying an older generation are rejected as stale.

use serde::Serialize;

use crate::domain::foundation::{AnalysisSessionId, Generation, Percentage, StateMachine};

use super::attempt::CaptureAttempt;
use super::errors::AnalysisError;
use super::kind::{AnalysisKind, Gender};
use super::label::Label;
use super::phase::{AcquisitionMethod, AnalysisPhase};
use super::vote::majority_label;

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: AnalysisSessionId,
    kind: AnalysisKind,
    gender: Gender,
    method: Option<AcquisitionMethod>,
    phase: AnalysisPhase,
    attempts: Vec<CaptureAttempt>,
    final_label: Option<Label>,
    locked: bool,
    generation: Generation,
    max_attempts: usize,
    last_failure: Option<String>,
}

impl AnalysisSession {
    /// Creates an idle session for a capturable kind.
    pub fn new(
        kind: AnalysisKind,
        gender: Gender,
        max_attempts: usize,
    ) -> Result<Self, AnalysisError> {
        if !kind.is_capturable() {
            return Err(AnalysisError::NotCapturable(kind));
        }
        if max_attempts == 0 {
            return Err(AnalysisError::invalid_input(
                "max_attempts must be at least 1",
            ));
        }
        Ok(Self {
            id: AnalysisSessionId::new(),
            kind,
            gender,
            method: None,
            phase: AnalysisPhase::Idle,
            attempts: Vec::with_capacity(max_attempts),
            final_label: None,
            locked: false,
            generation: Generation::default(),
            max_attempts,
            last_failure: None,
        })
    }

    pub fn id(&self) -> &AnalysisSessionId {
        &self.id
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn method(&self) -> Option<AcquisitionMethod> {
        self.method
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub fn attempts(&self) -> &[CaptureAttempt] {
        &self.attempts
    }

    pub fn final_label(&self) -> Option<&Label> {
        self.final_label.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.final_label.is_some()
    }

    /// Starts a camera or upload run and returns its generation.
    ///
    /// A finished or failed session is restarted from scratch.
    pub fn begin(&mut self, method: AcquisitionMethod) -> Result<Generation, AnalysisError> {
        if method == AcquisitionMethod::Manual {
            return Err(AnalysisError::InvalidTransition(
                "manual input does not start a capture".to_string(),
            ));
        }
        if self.locked {
            return Err(AnalysisError::Locked(self.kind));
        }
        if self.phase.is_active() {
            return Err(AnalysisError::CaptureInProgress(self.kind));
        }

        self.clear_run();
        self.phase = AnalysisPhase::Idle;
        self.method = Some(method);
        self.transition(AnalysisPhase::Capturing)?;
        Ok(self.generation)
    }

    /// Marks that the image for the current attempt is with the classifier.
    pub fn begin_classifying(&mut self, generation: Generation) -> Result<(), AnalysisError> {
        self.check_generation(generation)?;
        self.transition(AnalysisPhase::Classifying)
    }

    /// Appends an attempt; returns the voted label once the run is finished.
    pub fn record_attempt(
        &mut self,
        generation: Generation,
        attempt: CaptureAttempt,
    ) -> Result<Option<Label>, AnalysisError> {
        self.check_generation(generation)?;
        if self.phase != AnalysisPhase::Classifying {
            return Err(AnalysisError::InvalidTransition(format!(
                "cannot record an attempt while {:?}",
                self.phase
            )));
        }

        self.attempts.push(attempt);

        let finished = self.method == Some(AcquisitionMethod::Upload)
            || self.attempts.len() >= self.max_attempts;
        if !finished {
            self.transition(AnalysisPhase::Capturing)?;
            return Ok(None);
        }

        self.transition(AnalysisPhase::Finalizing)?;
        let labels: Vec<Label> = self.attempts.iter().map(|a| a.label.clone()).collect();
        let label = majority_label(&labels).ok_or_else(|| {
            AnalysisError::InvalidTransition("finalizing without attempts".to_string())
        })?;
        self.final_label = Some(label.clone());
        self.transition(AnalysisPhase::Done)?;
        Ok(Some(label))
    }

    /// Terminal failure of an upload run; the user retries or goes manual.
    pub fn fail_upload(
        &mut self,
        generation: Generation,
        reason: impl Into<String>,
    ) -> Result<(), AnalysisError> {
        self.check_generation(generation)?;
        self.transition(AnalysisPhase::Idle)?;
        self.attempts.clear();
        self.last_failure = Some(reason.into());
        Ok(())
    }

    /// Abandons any run and waits for a manual choice.
    ///
    /// Allowed on locked sessions; the lock only blocks automated capture.
    pub fn enter_manual(&mut self) -> Generation {
        self.clear_run();
        self.method = Some(AcquisitionMethod::Manual);
        self.phase = AnalysisPhase::ManualOverride;
        self.generation
    }

    /// Records the manual choice. The session must be in manual mode.
    pub fn select_manual(&mut self, label: Label) -> Result<Label, AnalysisError> {
        if self.phase != AnalysisPhase::ManualOverride {
            return Err(AnalysisError::InvalidTransition(format!(
                "manual selection requires manual mode, session is {:?}",
                self.phase
            )));
        }
        self.validate_choice(&label)?;
        self.final_label = Some(label.clone());
        self.transition(AnalysisPhase::Done)?;
        Ok(label)
    }

    /// Jumps straight to `Done` with `label`, discarding partial attempts.
    pub fn manual_override(&mut self, label: Label) -> Result<Label, AnalysisError> {
        self.validate_choice(&label)?;
        self.enter_manual();
        self.select_manual(label)
    }

    /// Back to `Idle`. The lock survives a reset.
    pub fn reset(&mut self) {
        self.clear_run();
        self.method = None;
        self.phase = AnalysisPhase::Idle;
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn progress(&self) -> Percentage {
        match (self.phase, self.method) {
            (AnalysisPhase::Done, _) => Percentage::HUNDRED,
            (AnalysisPhase::Classifying, Some(AcquisitionMethod::Upload))
            | (AnalysisPhase::Finalizing, Some(AcquisitionMethod::Upload)) => Percentage::HALF,
            (_, Some(AcquisitionMethod::Camera)) => {
                Percentage::of(self.attempts.len(), self.max_attempts)
            }
            _ => Percentage::ZERO,
        }
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        AnalysisSnapshot {
            kind: self.kind,
            phase: self.phase,
            method: self.method,
            attempts: self.attempts.len(),
            max_attempts: self.max_attempts,
            final_label: self.final_label.clone(),
            locked: self.locked,
            progress: self.progress(),
            last_failure: self.last_failure.clone(),
        }
    }

    fn validate_choice(&self, label: &Label) -> Result<(), AnalysisError> {
        if self.kind.accepts(label, self.gender) {
            Ok(())
        } else {
            Err(AnalysisError::invalid_input(format!(
                "'{}' is not a valid {} choice",
                label, self.kind
            )))
        }
    }

    fn check_generation(&self, generation: Generation) -> Result<(), AnalysisError> {
        if generation == self.generation {
            Ok(())
        } else {
            Err(AnalysisError::StaleResult(self.kind))
        }
    }

    fn transition(&mut self, target: AnalysisPhase) -> Result<(), AnalysisError> {
        self.phase = self
            .phase
            .transition_to(target)
            .map_err(|e| AnalysisError::InvalidTransition(e.to_string()))?;
        Ok(())
    }

    fn clear_run(&mut self) {
        self.generation = self.generation.next();
        self.attempts.clear();
        self.final_label = None;
        self.last_failure = None;
    }
}

/// Read-only view of a session for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSnapshot {
    pub kind: AnalysisKind,
    pub phase: AnalysisPhase,
    pub method: Option<AcquisitionMethod>,
    pub attempts: usize,
    pub max_attempts: usize,
    pub final_label: Option<Label>,
    pub locked: bool,
    pub progress: Percentage,
    pub last_failure: Option<String>,
}
