//! Mapping a resolution outcome to the profile that should be active

use crate::config::ConfigSnapshot;
use crate::resolver::Resolution;
use crate::targets::TargetSet;

/// Pick the desired profile.
///
/// No match selects `profile_off`. A matched keyword selects its own override
/// when it has a non-empty one, otherwise `profile_on`.
pub fn decide_profile<'a>(
    outcome: &Resolution,
    overrides: &'a TargetSet,
    profile_on: &'a str,
    profile_off: &'a str,
) -> &'a str {
    match outcome {
        Resolution::NoMatch => profile_off,
        Resolution::Matched(keyword) => overrides.override_for(keyword).unwrap_or(profile_on),
    }
}

impl ConfigSnapshot {
    pub fn desired_profile(&self, outcome: &Resolution) -> &str {
        decide_profile(outcome, &self.targets, &self.profile_on, &self.profile_off)
    }
}
