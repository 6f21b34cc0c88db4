//! Personality module - the fixed questionnaire and its scorer.
//!
//! - `question` - Axes, directions and the 16 static questions
//! - `scorer` - Pure scoring of an answer vector into a four-letter code
//! - `questionnaire` - Cursor/answer state for step-by-step answering

mod question;
mod questionnaire;
mod scorer;

pub use question::{Axis, Direction, Question, LIKERT_LABELS, QUESTIONS, QUESTION_COUNT};
pub use questionnaire::{NextOutcome, Questionnaire};
pub use scorer::{
    axis_scores, score, validate_answers, AxisScores, PersonalityCode, MAX_ANSWER, MIN_ANSWER,
    NEUTRAL_ANSWER,
};
