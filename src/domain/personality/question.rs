//! The fixed 16-question personality questionnaire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four personality axes, each with two opposing letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Introversion / Extraversion.
    IE,
    /// Sensing / Intuition.
    SN,
    /// Thinking / Feeling.
    TF,
    /// Judging / Perceiving.
    JP,
}

impl Axis {
    /// Axes in the order their letters appear in a personality code.
    pub const ALL: [Axis; 4] = [Axis::IE, Axis::SN, Axis::TF, Axis::JP];

    /// Letter selected by a zero or positive axis score.
    pub fn first_letter(&self) -> char {
        match self {
            Axis::IE => 'I',
            Axis::SN => 'S',
            Axis::TF => 'T',
            Axis::JP => 'J',
        }
    }

    /// Letter selected by a strictly negative axis score.
    pub fn second_letter(&self) -> char {
        match self {
            Axis::IE => 'E',
            Axis::SN => 'N',
            Axis::TF => 'F',
            Axis::JP => 'P',
        }
    }

    /// Position of this axis within a personality code.
    pub fn index(&self) -> usize {
        match self {
            Axis::IE => 0,
            Axis::SN => 1,
            Axis::TF => 2,
            Axis::JP => 3,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first_letter(), self.second_letter())
    }
}

/// Which letter of its axis agreement with a question pushes toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Agreement pushes toward the first letter (+1).
    TowardFirst,
    /// Agreement pushes toward the second letter (-1).
    TowardSecond,
}

impl Direction {
    /// Signed multiplier applied to a centred answer.
    pub fn sign(&self) -> i32 {
        match self {
            Direction::TowardFirst => 1,
            Direction::TowardSecond => -1,
        }
    }
}

/// A static questionnaire entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub text: &'static str,
    pub axis: Axis,
    pub direction: Direction,
}

const fn q(text: &'static str, axis: Axis, direction: Direction) -> Question {
    Question {
        text,
        axis,
        direction,
    }
}

use Axis::{IE, JP, SN, TF};
use Direction::{TowardFirst as FIRST, TowardSecond as SECOND};

/// Number of questions in the questionnaire.
pub const QUESTION_COUNT: usize = 16;

/// The questionnaire, in presentation order.
pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    q("You find it takes effort to introduce yourself to other people.", IE, FIRST),
    q("You get energized going to social events that involve many interactions.", IE, SECOND),
    q("You do not mind being at the center of attention.", IE, SECOND),
    q("You often prefer to work alone.", IE, FIRST),
    q("You consider yourself more practical than creative.", SN, FIRST),
    q("You often spend time exploring unrealistic and impractical yet intriguing ideas.", SN, SECOND),
    q("You often contemplate the reasons for human existence.", SN, SECOND),
    q("Your travel plans are usually well thought out.", SN, FIRST),
    q("Logic is usually more important than heart when it comes to making important decisions.", TF, FIRST),
    q("Winning a debate matters less to you than making sure no one gets upset.", TF, SECOND),
    q("You often have a hard time understanding other people's feelings.", TF, FIRST),
    q("You rarely worry about how your actions affect other people.", TF, FIRST),
    q("Your home and work environments are quite tidy.", JP, FIRST),
    q("Deadlines seem to you to be of relative rather than absolute importance.", JP, SECOND),
    q("Keeping your options open is more important than having a to-do list.", JP, SECOND),
    q("You like to have a to-do list for each day.", JP, FIRST),
];

/// Labels of the five-point agreement scale, indexed by `value - 1`.
pub const LIKERT_LABELS: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];
