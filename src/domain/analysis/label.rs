//! Classification label value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label returned by the classifier or picked by the user, e.g. `Warm`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Placeholder used when a classifier answers without the expected field.
    pub const UNKNOWN: &'static str = "Unknown";

    /// Creates a label, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_trims_whitespace() {
        assert_eq!(Label::new("  Cool \n").as_str(), "Cool");
        assert_eq!(Label::from("Oval").to_string(), "Oval");
    }

    #[test]
    fn unknown_label() {
        assert_eq!(Label::unknown().as_str(), "Unknown");
    }
}
