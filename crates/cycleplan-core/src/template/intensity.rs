//! Workout-intensity decisions over the decision table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CycleTemplate, TemplateRow};
use crate::error::TemplateError;
use crate::phase::{CoercionPolicy, Phase};

/// Final days of the follicular run that count as late follicular.
const LATE_FOLLICULAR_DAYS: u32 = 2;

/// Initial menstrual days that call for rest.
const REST_DAYS: u32 = 2;

/// Requested or recommended workout intensity.
///
/// Unrecognized requests are carried through unchanged as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intensity {
    Light,
    Moderate,
    Heavy,
    Other(String),
}

impl Intensity {
    pub fn as_str(&self) -> &str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Heavy => "heavy",
            Intensity::Other(s) => s,
        }
    }
}

impl From<&str> for Intensity {
    fn from(s: &str) -> Self {
        match s {
            "light" => Intensity::Light,
            "moderate" => Intensity::Moderate,
            "heavy" => Intensity::Heavy,
            other => Intensity::Other(other.to_string()),
        }
    }
}

impl From<String> for Intensity {
    fn from(s: String) -> Self {
        Intensity::from(s.as_str())
    }
}

impl From<Intensity> for String {
    fn from(i: Intensity) -> Self {
        i.as_str().to_string()
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intensity classification derived from phase before overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    RestOrVeryLight,
    Light,
    LightOrModerate,
    Moderate,
    ModerateToHeavy,
    Heavy,
}

impl IntensityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityBand::RestOrVeryLight => "rest_or_very_light",
            IntensityBand::Light => "light",
            IntensityBand::LightOrModerate => "light_or_moderate",
            IntensityBand::Moderate => "moderate",
            IntensityBand::ModerateToHeavy => "moderate_to_heavy",
            IntensityBand::Heavy => "heavy",
        }
    }
}

impl fmt::Display for IntensityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Override rules applied on top of the phase band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutRules {
    /// Symptom substrings that force a light recommendation.
    pub strong_pain_markers: Vec<String>,
}

impl Default for WorkoutRules {
    fn default() -> Self {
        Self {
            strong_pain_markers: vec!["strong_cramps".into(), "migraine".into()],
        }
    }
}

impl WorkoutRules {
    /// Case-insensitive substring match of any marker against any symptom.
    pub fn has_strong_pain(&self, symptoms: &[String]) -> bool {
        symptoms.iter().any(|symptom| {
            let symptom = symptom.to_lowercase();
            self.strong_pain_markers
                .iter()
                .any(|marker| symptom.contains(&marker.to_lowercase()))
        })
    }
}

/// Outcome of a workout-intensity decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDecision {
    pub cycle_day: u32,
    pub cycle_phase: Phase,
    pub desired_intensity: Intensity,
    pub base_intensity_pattern: IntensityBand,
    pub recommended_intensity: Intensity,
    pub ok_to_do_heavy: bool,
    pub energy_level: u8,
    pub rest_need: u8,
    pub symptoms: Vec<String>,
    pub reason: String,
}

impl CycleTemplate {
    fn base_band(&self, row: &TemplateRow) -> IntensityBand {
        let (position, run_len) = self.phase_run_position(row);
        match row.phase {
            Phase::Menstrual if position < REST_DAYS => IntensityBand::RestOrVeryLight,
            Phase::Menstrual => IntensityBand::Light,
            Phase::Follicular if position + LATE_FOLLICULAR_DAYS >= run_len => IntensityBand::Heavy,
            Phase::Follicular => IntensityBand::ModerateToHeavy,
            Phase::Ovulation => IntensityBand::Heavy,
            Phase::Luteal if position < run_len / 2 => IntensityBand::Moderate,
            Phase::Luteal => IntensityBand::LightOrModerate,
        }
    }

    /// Decide a workout intensity for any integer cycle day.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the normalized day has no row.
    pub fn decide_workout_intensity(
        &self,
        cycle_day: i64,
        desired: impl Into<Intensity>,
    ) -> Result<WorkoutDecision, TemplateError> {
        let desired = desired.into();
        let row = self.row_for(cycle_day)?;
        let band = self.base_band(row);
        let phase = row.phase;

        let overridden = row.energy_level <= 2
            || row.rest_need >= 4
            || self.rules.has_strong_pain(&row.symptoms);

        let (recommended, ok_heavy, reason) = if overridden {
            (
                Intensity::Light,
                false,
                "Your template for this cycle day shows low energy or high need for rest \
                 and/or stronger symptoms. A light workout or gentle movement is recommended."
                    .to_string(),
            )
        } else {
            reconcile(band, phase, &desired)
        };

        tracing::debug!(
            cycle_day = row.cycle_day,
            %phase,
            %band,
            %desired,
            %recommended,
            ok_heavy,
            "workout decision"
        );

        Ok(WorkoutDecision {
            cycle_day: row.cycle_day,
            cycle_phase: phase,
            desired_intensity: desired,
            base_intensity_pattern: band,
            recommended_intensity: recommended,
            ok_to_do_heavy: ok_heavy,
            energy_level: row.energy_level,
            rest_need: row.rest_need,
            symptoms: row.symptoms.clone(),
            reason,
        })
    }

    /// Decide for a calendar date.
    ///
    /// The cycle day is computed with the profile's `cycle_length` when given
    /// (non-positive values resolved through `policy`), otherwise with this
    /// table's length, and then normalized into the table.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the resulting day has no row.
    pub fn decide_workout_for_date(
        &self,
        last_period_start: NaiveDate,
        target: NaiveDate,
        cycle_length: Option<i64>,
        policy: &CoercionPolicy,
        desired: impl Into<Intensity>,
    ) -> Result<WorkoutDecision, TemplateError> {
        let cycle_length = cycle_length.unwrap_or(i64::from(self.cycle_length));
        let day = policy.cycle_day(target, last_period_start, cycle_length);
        self.decide_workout_intensity(i64::from(day), desired)
    }
}

fn reconcile(band: IntensityBand, phase: Phase, desired: &Intensity) -> (Intensity, bool, String) {
    let wants_heavy = *desired == Intensity::Heavy;
    match band {
        IntensityBand::Heavy | IntensityBand::ModerateToHeavy => {
            if wants_heavy {
                (
                    Intensity::Heavy,
                    true,
                    format!(
                        "You are in a high-energy phase ({phase}) with good predicted capacity. \
                         Heavy training is appropriate today if you feel up for it."
                    ),
                )
            } else {
                (
                    desired.clone(),
                    true,
                    "Your hormones support heavy training, but your chosen intensity is lower, \
                     which is a safe and good option."
                        .to_string(),
                )
            }
        }
        IntensityBand::Moderate => {
            if wants_heavy {
                (
                    Intensity::Moderate,
                    false,
                    "Hormone and energy patterns suggest a moderate workout is better today. \
                     Heavy training might be more fatiguing than usual."
                        .to_string(),
                )
            } else {
                (
                    desired.clone(),
                    true,
                    format!(
                        "A {desired} workout fits your current {phase} phase and predicted energy level."
                    ),
                )
            }
        }
        IntensityBand::LightOrModerate | IntensityBand::RestOrVeryLight | IntensityBand::Light => {
            if wants_heavy {
                (
                    Intensity::Light,
                    false,
                    "This day is closer to PMS/menstrual conditions or shows higher rest need. \
                     Heavy workouts are not recommended; choose light activity or rest instead."
                        .to_string(),
                )
            } else {
                (
                    Intensity::Light,
                    false,
                    "Light activity is recommended today to support recovery and hormone balance."
                        .to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateOptions;
    use indoc::indoc;
    use proptest::prelude::*;

    fn builtin() -> CycleTemplate {
        CycleTemplate::builtin().unwrap()
    }

    #[test]
    fn low_energy_day_forces_light() {
        let decision = builtin().decide_workout_intensity(1, "heavy").unwrap();
        assert_eq!(decision.cycle_day, 1);
        assert_eq!(decision.cycle_phase, Phase::Menstrual);
        assert_eq!(decision.base_intensity_pattern, IntensityBand::RestOrVeryLight);
        assert_eq!(decision.recommended_intensity, Intensity::Light);
        assert!(!decision.ok_to_do_heavy);
        assert_eq!(decision.energy_level, 1);
    }

    #[test]
    fn late_follicular_grants_heavy() {
        let decision = builtin().decide_workout_intensity(11, "heavy").unwrap();
        assert_eq!(decision.base_intensity_pattern, IntensityBand::Heavy);
        assert_eq!(decision.recommended_intensity, Intensity::Heavy);
        assert!(decision.ok_to_do_heavy);
    }

    #[test]
    fn follicular_band_turns_heavy_for_last_two_days() {
        let template = builtin();
        for day in 6..=10 {
            let decision = template.decide_workout_intensity(day, "moderate").unwrap();
            assert_eq!(
                decision.base_intensity_pattern,
                IntensityBand::ModerateToHeavy,
                "day {day}"
            );
        }
        for day in 11..=12 {
            let decision = template.decide_workout_intensity(day, "moderate").unwrap();
            assert_eq!(decision.base_intensity_pattern, IntensityBand::Heavy, "day {day}");
        }
    }

    #[test]
    fn early_follicular_grants_lower_request() {
        let decision = builtin().decide_workout_intensity(7, "moderate").unwrap();
        assert_eq!(decision.base_intensity_pattern, IntensityBand::ModerateToHeavy);
        assert_eq!(decision.recommended_intensity, Intensity::Moderate);
        assert!(decision.ok_to_do_heavy);
    }

    #[test]
    fn mid_luteal_downgrades_heavy_to_moderate() {
        let decision = builtin().decide_workout_intensity(17, "heavy").unwrap();
        assert_eq!(decision.cycle_phase, Phase::Luteal);
        assert_eq!(decision.base_intensity_pattern, IntensityBand::Moderate);
        assert_eq!(decision.recommended_intensity, Intensity::Moderate);
        assert!(!decision.ok_to_do_heavy);

        let light = builtin().decide_workout_intensity(17, "light").unwrap();
        assert_eq!(light.recommended_intensity, Intensity::Light);
        assert!(light.ok_to_do_heavy);
    }

    #[test]
    fn late_luteal_band_grants_only_light() {
        let decision = builtin().decide_workout_intensity(22, "moderate").unwrap();
        assert_eq!(decision.base_intensity_pattern, IntensityBand::LightOrModerate);
        assert_eq!(decision.recommended_intensity, Intensity::Light);
        assert!(!decision.ok_to_do_heavy);
    }

    #[test]
    fn strong_pain_marker_overrides_good_energy() {
        let csv = indoc! {r#"
            Cycle_Day,Cycle_Phase,Energy_Level_1to5,Rest_Need_1to5,Expected_Symptoms
            1,Ovulatory,5,1,"Severe MIGRAINE"
        "#};
        let template = CycleTemplate::from_reader(
            csv.as_bytes(),
            TemplateOptions {
                cycle_length: 1,
                require_complete: true,
            },
        )
        .unwrap();
        let decision = template.decide_workout_intensity(1, "heavy").unwrap();
        assert_eq!(decision.base_intensity_pattern, IntensityBand::Heavy);
        assert_eq!(decision.recommended_intensity, Intensity::Light);
        assert!(!decision.ok_to_do_heavy);
    }

    #[test]
    fn custom_markers_replace_defaults() {
        let rules = WorkoutRules {
            strong_pain_markers: vec!["high_libido".into()],
        };
        let template = builtin().with_rules(rules);
        let decision = template.decide_workout_intensity(13, "heavy").unwrap();
        assert_eq!(decision.recommended_intensity, Intensity::Light);
    }

    #[test]
    fn unknown_request_passes_through_in_permissive_bands() {
        let decision = builtin().decide_workout_intensity(13, "yoga").unwrap();
        assert_eq!(decision.recommended_intensity, Intensity::Other("yoga".into()));
        assert!(decision.ok_to_do_heavy);
    }

    #[test]
    fn out_of_range_days_are_normalized() {
        let a = builtin().decide_workout_intensity(29, "heavy").unwrap();
        let b = builtin().decide_workout_intensity(1, "heavy").unwrap();
        assert_eq!(a, b);
        assert_eq!(builtin().decide_workout_intensity(-14, "light").unwrap().cycle_day, 14);
    }

    #[test]
    fn date_convenience_defaults_to_table_cycle_length() {
        let anchor = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let target = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        let decision = builtin()
            .decide_workout_for_date(
                anchor,
                target,
                None,
                &CoercionPolicy::default(),
                Intensity::Heavy,
            )
            .unwrap();
        assert_eq!(decision.cycle_day, 14);
        assert_eq!(decision.cycle_phase, Phase::Ovulation);
    }

    #[test]
    fn date_convenience_follows_profile_cycle_length() {
        let anchor = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let target = anchor + chrono::Duration::days(40);
        let policy = CoercionPolicy::default();
        let decision = builtin()
            .decide_workout_for_date(anchor, target, Some(35), &policy, "light")
            .unwrap();
        assert_eq!(decision.cycle_day, 6);
        assert_eq!(decision.cycle_phase, Phase::Follicular);

        let coerced = builtin()
            .decide_workout_for_date(anchor, target, Some(0), &policy, "light")
            .unwrap();
        assert_eq!(coerced.cycle_day, 13);
    }

    #[test]
    fn intensity_serializes_as_plain_string() {
        let json = serde_json::to_string(&Intensity::Other("swim".into())).unwrap();
        assert_eq!(json, "\"swim\"");
        let back: Intensity = serde_json::from_str("\"heavy\"").unwrap();
        assert_eq!(back, Intensity::Heavy);
    }

    proptest! {
        #[test]
        fn overrides_always_forbid_heavy(day in -200i64..200, request in "light|moderate|heavy|[a-z]{1,8}") {
            let template = builtin();
            let decision = template.decide_workout_intensity(day, request.as_str()).unwrap();
            let forced = decision.energy_level <= 2
                || decision.rest_need >= 4
                || template.rules().has_strong_pain(&decision.symptoms);
            if forced {
                prop_assert!(!decision.ok_to_do_heavy);
                prop_assert_eq!(&decision.recommended_intensity, &Intensity::Light);
            }
            prop_assert!(decision.cycle_day >= 1 && decision.cycle_day <= 28);
        }
    }
}
