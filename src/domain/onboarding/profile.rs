//! User profile, partial updates and the completion payload.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::analysis::{Gender, Label};
use crate::domain::personality::PersonalityCode;

use super::errors::OnboardingError;

/// The signed-in user's profile as held in the local context.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(
        default,
        deserialize_with = "id_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// The backend sends `""` until basic info is submitted.
    #[serde(default, deserialize_with = "blank_gender_as_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skin_tone: Option<String>,
    #[serde(default)]
    pub face_shape: Option<String>,
    #[serde(default)]
    pub body_shape: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub onboarding_completed: bool,
}

impl UserProfile {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn has_basic_info(&self) -> bool {
        !self.name.trim().is_empty() && self.gender.is_some()
    }

    /// Merges `update` into this profile; absent fields are left alone.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
        if let Some(location) = &update.location {
            self.location = Some(location.clone());
        }
        if let Some(results) = &update.results {
            self.skin_tone = results.skin_tone.as_ref().map(Label::to_string);
            self.face_shape = results.face_shape.as_ref().map(Label::to_string);
            self.body_shape = results.body_shape.as_ref().map(Label::to_string);
            self.personality = results.personality.as_ref().map(PersonalityCode::as_string);
        }
        if let Some(done) = update.onboarding_completed {
            self.onboarding_completed = done;
        }
    }

    pub fn merged(mut self, update: &ProfileUpdate) -> Self {
        self.apply(update);
        self
    }
}

fn blank_gender_as_none<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("male") => Ok(Some(Gender::Male)),
        Some("female") => Ok(Some(Gender::Female)),
        Some(other) => Err(serde::de::Error::unknown_variant(other, &["male", "female"])),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Backend ids arrive as numbers or strings.
fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// Results of every analysis kind; `None` means skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub skin_tone: Option<Label>,
    pub face_shape: Option<Label>,
    pub body_shape: Option<Label>,
    pub personality: Option<PersonalityCode>,
}

impl AnalysisResults {
    pub fn is_empty(&self) -> bool {
        self.skin_tone.is_none()
            && self.face_shape.is_none()
            && self.body_shape.is_none()
            && self.personality.is_none()
    }
}

/// Partial record merged into a [`UserProfile`].
///
/// `results`, when present, replaces all four analysis fields at once so
/// that skipped kinds are written back as nulls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
}

impl ProfileUpdate {
    pub fn basic_info(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: Some(name.into()),
            gender: Some(gender),
            ..Self::default()
        }
    }

    pub fn with_results(results: AnalysisResults) -> Self {
        Self {
            results: Some(results),
            ..Self::default()
        }
    }

    pub fn completed() -> Self {
        Self {
            onboarding_completed: Some(true),
            ..Self::default()
        }
    }
}

/// Body of the remote "onboarding finished" update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingSubmission {
    pub onboarding_completed: bool,
    pub name: String,
    pub gender: Gender,
    pub skin_tone: Option<String>,
    pub face_shape: Option<String>,
    pub body_shape: Option<String>,
    pub personality: Option<String>,
}

impl OnboardingSubmission {
    /// Requires name and gender; analysis fields are sent as-is.
    pub fn from_profile(profile: &UserProfile) -> Result<Self, OnboardingError> {
        let name = profile.name.trim();
        if name.is_empty() {
            return Err(OnboardingError::MissingField("name"));
        }
        let gender = profile.gender.ok_or(OnboardingError::MissingField("gender"))?;
        Ok(Self {
            onboarding_completed: true,
            name: name.to_string(),
            gender,
            skin_tone: profile.skin_tone.clone(),
            face_shape: profile.face_shape.clone(),
            body_shape: profile.body_shape.clone(),
            personality: profile.personality.clone(),
        })
    }
}
