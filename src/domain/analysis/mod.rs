//! Image-based analysis: kinds, attempts, voting and the session aggregate.

mod attempt;
mod errors;
mod kind;
mod label;
mod phase;
mod session;
mod vote;

pub use attempt::{CaptureAttempt, CapturedImage, LabelSource};
pub use errors::AnalysisError;
pub use kind::{
    AnalysisKind, Gender, FACE_SHAPES, FEMALE_BODY_SHAPES, MALE_BODY_SHAPES, SKIN_TONES,
};
pub use label::Label;
pub use phase::{AcquisitionMethod, AnalysisPhase};
pub use session::{AnalysisSession, AnalysisSnapshot};
pub use vote::{majority_label, mode};
