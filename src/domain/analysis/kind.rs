//! Analysis kinds, their label vocabularies and fallback defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::label::Label;

/// Gender selected during basic info; drives the body-shape vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something the onboarding flow determines about the user.
///
/// The first three come from images; personality comes from the
/// questionnaire and is never captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    SkinTone,
    FaceShape,
    BodyShape,
    Personality,
}

pub const SKIN_TONES: &[&str] = &["Warm", "Cool", "Neutral"];

pub const FACE_SHAPES: &[&str] = &["Oval", "Round", "Square", "Heart", "Diamond", "Rectangle"];

pub const FEMALE_BODY_SHAPES: &[&str] =
    &["Hourglass", "Rectangle", "Inverted Triangle", "Apple", "Pear"];

pub const MALE_BODY_SHAPES: &[&str] = &["Mesomorph", "Ectomorph", "Trapezoid", "Endomorph"];

impl AnalysisKind {
    /// Kinds that go through camera/upload capture.
    pub const CAPTURABLE: [AnalysisKind; 3] = [
        AnalysisKind::SkinTone,
        AnalysisKind::FaceShape,
        AnalysisKind::BodyShape,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::SkinTone => "skin_tone",
            AnalysisKind::FaceShape => "face_shape",
            AnalysisKind::BodyShape => "body_shape",
            AnalysisKind::Personality => "personality",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisKind::SkinTone => "Skin Tone",
            AnalysisKind::FaceShape => "Face Shape",
            AnalysisKind::BodyShape => "Body Shape",
            AnalysisKind::Personality => "Personality",
        }
    }

    pub fn is_capturable(&self) -> bool {
        !matches!(self, AnalysisKind::Personality)
    }

    /// Only skin tone blocks progress when missing.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, AnalysisKind::SkinTone)
    }

    /// Fixed manual choice set.
    pub fn choices(&self, gender: Gender) -> &'static [&'static str] {
        match (self, gender) {
            (AnalysisKind::SkinTone, _) => SKIN_TONES,
            (AnalysisKind::FaceShape, _) => FACE_SHAPES,
            (AnalysisKind::BodyShape, Gender::Female) => FEMALE_BODY_SHAPES,
            (AnalysisKind::BodyShape, Gender::Male) => MALE_BODY_SHAPES,
            (AnalysisKind::Personality, _) => &[],
        }
    }

    /// Whether `label` is one of the manual choices for this kind.
    pub fn accepts(&self, label: &Label, gender: Gender) -> bool {
        self.choices(gender).contains(&label.as_str())
    }

    /// Label recorded in place of a failed classification.
    pub fn fallback_label(&self, gender: Gender) -> Option<Label> {
        let label = match (self, gender) {
            (AnalysisKind::SkinTone, _) => "Warm",
            (AnalysisKind::FaceShape, _) => "Oval",
            (AnalysisKind::BodyShape, Gender::Female) => "Hourglass",
            (AnalysisKind::BodyShape, Gender::Male) => "Mesomorph",
            (AnalysisKind::Personality, _) => return None,
        };
        Some(Label::new(label))
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_labels_follow_kind_and_gender() {
        assert_eq!(
            AnalysisKind::SkinTone.fallback_label(Gender::Male).unwrap().as_str(),
            "Warm"
        );
        assert_eq!(
            AnalysisKind::FaceShape.fallback_label(Gender::Female).unwrap().as_str(),
            "Oval"
        );
        assert_eq!(
            AnalysisKind::BodyShape.fallback_label(Gender::Female).unwrap().as_str(),
            "Hourglass"
        );
        assert_eq!(
            AnalysisKind::BodyShape.fallback_label(Gender::Male).unwrap().as_str(),
            "Mesomorph"
        );
        assert!(AnalysisKind::Personality.fallback_label(Gender::Male).is_none());
    }

    #[test]
    fn fallback_label_is_always_a_valid_choice() {
        for kind in AnalysisKind::CAPTURABLE {
            for gender in [Gender::Male, Gender::Female] {
                let label = kind.fallback_label(gender).unwrap();
                assert!(kind.accepts(&label, gender), "{} / {}", kind, gender);
            }
        }
    }

    #[test]
    fn body_choices_depend_on_gender() {
        let hourglass = Label::new("Hourglass");
        assert!(AnalysisKind::BodyShape.accepts(&hourglass, Gender::Female));
        assert!(!AnalysisKind::BodyShape.accepts(&hourglass, Gender::Male));
    }

    #[test]
    fn only_skin_tone_is_mandatory() {
        assert!(AnalysisKind::SkinTone.is_mandatory());
        assert!(!AnalysisKind::FaceShape.is_mandatory());
        assert!(!AnalysisKind::BodyShape.is_mandatory());
        assert!(!AnalysisKind::Personality.is_mandatory());
    }

    #[test]
    fn kinds_serialize_snake_case() {
        let json = serde_json::to_string(&AnalysisKind::FaceShape).unwrap();
        assert_eq!(json, "\"face_shape\"");
        assert_eq!(AnalysisKind::FaceShape.as_str(), "face_shape");
    }
}
