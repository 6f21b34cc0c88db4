//! Where a user lands based on their profile.

use serde::Serialize;
use std::fmt;

use crate::domain::analysis::Gender;

use super::profile::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingRoute {
    Guest,
    Onboarding,
    Male,
    Female,
}

impl LandingRoute {
    /// No profile goes to the guest page, unfinished onboarding resumes,
    /// everyone else gets the gender homepage (female when unset).
    pub fn for_profile(profile: Option<&UserProfile>) -> Self {
        match profile {
            None => LandingRoute::Guest,
            Some(p) if !p.onboarding_completed => LandingRoute::Onboarding,
            Some(p) => match p.gender {
                Some(Gender::Male) => LandingRoute::Male,
                Some(Gender::Female) | None => LandingRoute::Female,
            },
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            LandingRoute::Guest => "/",
            LandingRoute::Onboarding => "/onboarding",
            LandingRoute::Male => "/male",
            LandingRoute::Female => "/female",
        }
    }
}

impl fmt::Display for LandingRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub fn should_show_guest_ui(profile: Option<&UserProfile>) -> bool {
    profile.map_or(true, |p| !p.onboarding_completed)
}

pub fn should_show_onboarding(profile: Option<&UserProfile>) -> bool {
    profile.map_or(false, |p| !p.onboarding_completed)
}

pub fn should_show_gender_homepage(profile: Option<&UserProfile>) -> bool {
    profile.map_or(false, |p| p.onboarding_completed && p.gender.is_some())
}
