//! Step-by-step questionnaire state.
//!
//! Holds the answer vector and the question cursor. Scoring happens on the
//! final `next()` and is recomputed from the whole vector each time, so
//! going back and changing an answer and finishing again is always safe.

use crate::domain::foundation::{Percentage, ValidationError};

use super::question::{Question, QUESTIONS, QUESTION_COUNT};
use super::scorer::{score, PersonalityCode, MAX_ANSWER, MIN_ANSWER, NEUTRAL_ANSWER};

/// What `Questionnaire::next` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// Moved to the question at this index.
    Question(usize),
    /// Last question answered; the questionnaire was scored.
    Finished(PersonalityCode),
}

/// A questionnaire in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    answers: [u8; QUESTION_COUNT],
    index: usize,
    result: Option<PersonalityCode>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    /// Starts at the first question with every answer neutral.
    pub fn new() -> Self {
        Self {
            answers: [NEUTRAL_ANSWER; QUESTION_COUNT],
            index: 0,
            result: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn answers(&self) -> &[u8] {
        &self.answers
    }

    pub fn current_question(&self) -> &'static Question {
        &QUESTIONS[self.index]
    }

    pub fn is_last(&self) -> bool {
        self.index == QUESTION_COUNT - 1
    }

    /// Scored code, present after finishing and until `retake`.
    pub fn result(&self) -> Option<&PersonalityCode> {
        self.result.as_ref()
    }

    /// Records the answer for the current question.
    pub fn answer(&mut self, value: u8) -> Result<(), ValidationError> {
        if !(MIN_ANSWER..=MAX_ANSWER).contains(&value) {
            return Err(ValidationError::out_of_range(
                format!("answers[{}]", self.index),
                MIN_ANSWER as i32,
                MAX_ANSWER as i32,
                value as i32,
            ));
        }
        self.answers[self.index] = value;
        Ok(())
    }

    /// Advances, or scores the whole vector when on the last question.
    pub fn next(&mut self) -> Result<NextOutcome, ValidationError> {
        if self.is_last() {
            let code = score(&self.answers)?;
            self.result = Some(code.clone());
            return Ok(NextOutcome::Finished(code));
        }
        self.index += 1;
        Ok(NextOutcome::Question(self.index))
    }

    /// Moves to the previous question. Returns false at the first question.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Leaves the result view, keeping answers and position.
    pub fn retake(&mut self) {
        self.result = None;
    }

    /// "Question n of 16".
    pub fn position_label(&self) -> String {
        format!("Question {} of {}", self.index + 1, QUESTION_COUNT)
    }

    pub fn progress(&self) -> Percentage {
        if self.result.is_some() {
            return Percentage::HUNDRED;
        }
        Percentage::of(self.index, QUESTION_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(q: &mut Questionnaire) -> PersonalityCode {
        loop {
            match q.next().unwrap() {
                NextOutcome::Question(_) => continue,
                NextOutcome::Finished(code) => return code,
            }
        }
    }

    #[test]
    fn starts_neutral_at_first_question() {
        let q = Questionnaire::new();
        assert_eq!(q.index(), 0);
        assert!(q.answers().iter().all(|&a| a == NEUTRAL_ANSWER));
        assert_eq!(q.position_label(), "Question 1 of 16");
        assert!(q.result().is_none());
    }

    #[test]
    fn untouched_questionnaire_finishes_as_istj() {
        let mut q = Questionnaire::new();
        assert_eq!(finish(&mut q).to_string(), "ISTJ");
        assert_eq!(q.progress(), Percentage::HUNDRED);
    }

    #[test]
    fn back_is_noop_on_first_question() {
        let mut q = Questionnaire::new();
        assert!(!q.back());
        q.next().unwrap();
        assert!(q.back());
        assert_eq!(q.index(), 0);
    }

    #[test]
    fn editing_an_earlier_answer_rescores_from_scratch() {
        let mut q = Questionnaire::new();
        // Question 1 and 2 push toward E.
        q.next().unwrap();
        q.answer(5).unwrap();
        q.next().unwrap();
        q.answer(5).unwrap();
        assert_eq!(finish(&mut q).to_string(), "ESTJ");

        q.retake();
        while q.index() > 1 {
            q.back();
        }
        q.answer(3).unwrap();
        assert_eq!(finish(&mut q).to_string(), "ESTJ");

        q.retake();
        while q.index() > 2 {
            q.back();
        }
        q.answer(3).unwrap();
        assert_eq!(finish(&mut q).to_string(), "ISTJ");
    }

    #[test]
    fn answer_rejects_values_off_the_scale() {
        let mut q = Questionnaire::new();
        assert!(q.answer(0).is_err());
        assert!(q.answer(6).is_err());
        assert_eq!(q.answers()[0], NEUTRAL_ANSWER);
    }

    #[test]
    fn retake_keeps_answers() {
        let mut q = Questionnaire::new();
        q.answer(1).unwrap();
        finish(&mut q);
        q.retake();
        assert!(q.result().is_none());
        assert_eq!(q.answers()[0], 1);
        assert!(q.is_last());
    }
}
