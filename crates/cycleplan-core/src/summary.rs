//! Cycle summary for a single day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::phase::{label_of, tips_of, CoercionPolicy, Phase, PhaseTips};
use crate::profile::CycleProfile;

/// Cycle day, phase and care tips for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub today: NaiveDate,
    pub cycle_day: u32,
    pub phase: Phase,
    pub phase_label: String,
    pub tips: PhaseTips,
}

/// Summarize `today` for a profile.
pub fn summarize(profile: &CycleProfile, today: NaiveDate, policy: &CoercionPolicy) -> CycleSummary {
    let (cycle_day, phase) = profile.phase_on(today, policy);
    CycleSummary {
        today,
        cycle_day,
        phase,
        phase_label: label_of(phase).to_string(),
        tips: tips_of(phase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_phase_tables() {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let profile = CycleProfile::new(anchor);
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();

        let summary = summarize(&profile, today, &CoercionPolicy::default());
        assert_eq!(summary.cycle_day, 20);
        assert_eq!(summary.phase, Phase::Luteal);
        assert_eq!(summary.phase_label, "Luteal phase");
        assert_eq!(summary.tips, tips_of(Phase::Luteal));
    }
}
