//! Questionnaire scorer: answer vector in, four-letter personality code out.
//!
//! Pure and stateless. Every call recomputes from the full answer slice so
//! callers may rescore freely after the user edits an earlier answer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::question::{Axis, QUESTIONS, QUESTION_COUNT};

/// Lowest value on the agreement scale.
pub const MIN_ANSWER: u8 = 1;
/// Highest value on the agreement scale.
pub const MAX_ANSWER: u8 = 5;
/// Neutral answer; contributes nothing to any axis.
pub const NEUTRAL_ANSWER: u8 = 3;

/// Signed per-axis sums, indexed like `Axis::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisScores([i32; 4]);

impl AxisScores {
    /// Returns the signed score for one axis.
    pub fn get(&self, axis: Axis) -> i32 {
        self.0[axis.index()]
    }

    /// Letter chosen for an axis. Zero resolves to the first letter.
    pub fn letter(&self, axis: Axis) -> char {
        if self.get(axis) < 0 {
            axis.second_letter()
        } else {
            axis.first_letter()
        }
    }
}

/// A four-letter personality code such as `ISTJ`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonalityCode([char; 4]);

impl PersonalityCode {
    /// Returns the letter for an axis.
    pub fn letter(&self, axis: Axis) -> char {
        self.0[axis.index()]
    }

    /// Returns the code as an owned string.
    pub fn as_string(&self) -> String {
        self.0.iter().collect()
    }
}

impl fmt::Display for PersonalityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl TryFrom<String> for PersonalityCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() != 4 {
            return Err(ValidationError::invalid_format(
                "personality",
                format!("expected 4 letters, got '{}'", value),
            ));
        }
        let mut letters = ['?'; 4];
        for (axis, c) in Axis::ALL.iter().zip(chars) {
            if c != axis.first_letter() && c != axis.second_letter() {
                return Err(ValidationError::invalid_format(
                    "personality",
                    format!("'{}' is not a letter of axis {}", c, axis),
                ));
            }
            letters[axis.index()] = c;
        }
        Ok(Self(letters))
    }
}

impl From<PersonalityCode> for String {
    fn from(code: PersonalityCode) -> Self {
        code.as_string()
    }
}

/// Checks length and range of an answer slice.
pub fn validate_answers(answers: &[u8]) -> Result<(), ValidationError> {
    if answers.len() != QUESTION_COUNT {
        return Err(ValidationError::invalid_format(
            "answers",
            format!(
                "expected {} answers, got {}",
                QUESTION_COUNT,
                answers.len()
            ),
        ));
    }
    if let Some((i, &bad)) = answers
        .iter()
        .enumerate()
        .find(|&(_, &v)| !(MIN_ANSWER..=MAX_ANSWER).contains(&v))
    {
        return Err(ValidationError::out_of_range(
            format!("answers[{}]", i),
            MIN_ANSWER as i32,
            MAX_ANSWER as i32,
            bad as i32,
        ));
    }
    Ok(())
}

/// Computes the signed sum for every axis.
pub fn axis_scores(answers: &[u8]) -> Result<AxisScores, ValidationError> {
    validate_answers(answers)?;

    let mut sums = [0i32; 4];
    for (question, &answer) in QUESTIONS.iter().zip(answers) {
        let centred = answer as i32 - NEUTRAL_ANSWER as i32;
        sums[question.axis.index()] += centred * question.direction.sign();
    }
    Ok(AxisScores(sums))
}

/// Scores a full answer vector.
///
/// # Errors
///
/// `ValidationError` if the slice does not hold exactly one answer per
/// question or any answer falls outside 1..=5.
pub fn score(answers: &[u8]) -> Result<PersonalityCode, ValidationError> {
    let scores = axis_scores(answers)?;
    let mut letters = ['?'; 4];
    for axis in Axis::ALL {
        letters[axis.index()] = scores.letter(axis);
    }
    Ok(PersonalityCode(letters))
}
