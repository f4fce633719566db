//! Cycle profiles and the repository seam they are read through.
//!
//! The engine never touches storage directly: collaborators implement
//! [`ProfileRepository`] and the service converts stored records into
//! [`CycleProfile`] values per request.

mod repository;

pub use repository::{InMemoryProfiles, JsonFileProfiles, ProfileRepository};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::phase::{CoercionPolicy, Phase, DEFAULT_BLEED_DAYS, DEFAULT_CYCLE_LENGTH};

/// Cycle anchor and shape for one user.
///
/// Lengths are kept as reported; non-positive values are resolved by a
/// [`CoercionPolicy`] at computation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProfile {
    /// Start of the last reported period
    pub last_period_start: NaiveDate,
    pub cycle_length: i64,
    pub bleed_days: i64,
}

impl CycleProfile {
    /// Profile with the default 28-day cycle and 5 bleed days.
    pub fn new(last_period_start: NaiveDate) -> Self {
        Self {
            last_period_start,
            cycle_length: i64::from(DEFAULT_CYCLE_LENGTH),
            bleed_days: i64::from(DEFAULT_BLEED_DAYS),
        }
    }

    pub fn with_cycle_length(mut self, cycle_length: i64) -> Self {
        self.cycle_length = cycle_length;
        self
    }

    pub fn with_bleed_days(mut self, bleed_days: i64) -> Self {
        self.bleed_days = bleed_days;
        self
    }

    /// Cycle day and phase on `date`.
    pub fn phase_on(&self, date: NaiveDate, policy: &CoercionPolicy) -> (u32, Phase) {
        policy.phase_for_date(date, self.last_period_start, self.cycle_length, self.bleed_days)
    }
}

/// Profile as persisted by a storage collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub user_id: String,
    /// ISO calendar date, may be missing for users mid-onboarding
    #[serde(default)]
    pub last_period_start: Option<String>,
    #[serde(default)]
    pub cycle_length: Option<i64>,
    #[serde(default)]
    pub menstruation_phase_duration: Option<i64>,
}

impl ProfileRecord {
    /// Validate the anchor and build a profile; absent lengths use defaults.
    pub fn to_cycle_profile(&self) -> Result<CycleProfile, ProfileError> {
        let raw = self
            .last_period_start
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProfileError::Incomplete {
                user_id: self.user_id.clone(),
            })?;
        let anchor = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ProfileError::InvalidAnchor {
                user_id: self.user_id.clone(),
                value: raw.to_string(),
            }
        })?;
        Ok(CycleProfile::new(anchor)
            .with_cycle_length(self.cycle_length.unwrap_or(i64::from(DEFAULT_CYCLE_LENGTH)))
            .with_bleed_days(
                self.menstruation_phase_duration
                    .unwrap_or(i64::from(DEFAULT_BLEED_DAYS)),
            ))
    }
}
