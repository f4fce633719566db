//! Date to cycle-day to phase mapping.
//!
//! Cycle days are 1-based and computed with floored modulo, so an anchor
//! that lies after the target date still resolves into `1..=cycle_length`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Phase;

/// Substitute for a non-positive cycle length.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// Substitute for a non-positive bleed-day count.
pub const DEFAULT_BLEED_DAYS: u32 = 5;

/// Which input a coercion replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercedField {
    CycleLength,
    BleedDays,
}

/// Record of one default substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coercion {
    pub field: CoercedField,
    /// Value supplied by the caller
    pub given: i64,
    /// Value used instead
    pub substituted: u32,
}

/// Effective cycle parameters after the policy has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCycle {
    pub cycle_length: u32,
    pub bleed_days: u32,
    pub coercions: Vec<Coercion>,
}

impl ResolvedCycle {
    /// Whether any input was replaced by a default.
    pub fn was_coerced(&self) -> bool {
        !self.coercions.is_empty()
    }
}

/// Default-substitution policy for degenerate cycle inputs.
///
/// Non-positive values are never an error: they are replaced by the
/// configured defaults and the substitution is reported in
/// [`ResolvedCycle::coercions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionPolicy {
    pub default_cycle_length: u32,
    pub default_bleed_days: u32,
}

impl Default for CoercionPolicy {
    fn default() -> Self {
        Self {
            default_cycle_length: DEFAULT_CYCLE_LENGTH,
            default_bleed_days: DEFAULT_BLEED_DAYS,
        }
    }
}

impl CoercionPolicy {
    /// Create a policy; zero defaults fall back to the built-in ones.
    pub fn new(default_cycle_length: u32, default_bleed_days: u32) -> Self {
        Self {
            default_cycle_length: if default_cycle_length == 0 {
                DEFAULT_CYCLE_LENGTH
            } else {
                default_cycle_length
            },
            default_bleed_days: if default_bleed_days == 0 {
                DEFAULT_BLEED_DAYS
            } else {
                default_bleed_days
            },
        }
    }

    /// Apply the policy to raw inputs.
    pub fn resolve(&self, cycle_length: i64, bleed_days: i64) -> ResolvedCycle {
        let mut coercions = Vec::new();
        let cycle_length = self.resolve_field(
            CoercedField::CycleLength,
            cycle_length,
            self.default_cycle_length,
            &mut coercions,
        );
        let bleed_days = self.resolve_field(
            CoercedField::BleedDays,
            bleed_days,
            self.default_bleed_days,
            &mut coercions,
        );
        ResolvedCycle {
            cycle_length,
            bleed_days,
            coercions,
        }
    }

    /// Effective cycle length alone.
    pub fn resolve_cycle_length(&self, cycle_length: i64) -> u32 {
        let mut coercions = Vec::new();
        self.resolve_field(
            CoercedField::CycleLength,
            cycle_length,
            self.default_cycle_length,
            &mut coercions,
        )
    }

    fn resolve_field(
        &self,
        field: CoercedField,
        given: i64,
        default: u32,
        coercions: &mut Vec<Coercion>,
    ) -> u32 {
        if given > 0 {
            return u32::try_from(given).unwrap_or(u32::MAX);
        }
        tracing::debug!(?field, given, substituted = default, "substituting default");
        coercions.push(Coercion {
            field,
            given,
            substituted: default,
        });
        default
    }

    /// Cycle day of `target` relative to `anchor`, in `1..=cycle_length`.
    pub fn cycle_day(&self, target: NaiveDate, anchor: NaiveDate, cycle_length: i64) -> u32 {
        let len = i64::from(self.resolve_cycle_length(cycle_length));
        let days_since_anchor = (target - anchor).num_days();
        (days_since_anchor.rem_euclid(len) + 1) as u32
    }

    /// Phase of a cycle day.
    pub fn phase_of(&self, cycle_day: u32, cycle_length: i64, bleed_days: i64) -> Phase {
        let resolved = self.resolve(cycle_length, bleed_days);
        PhaseBoundaries::new(resolved.cycle_length, resolved.bleed_days).phase_at(cycle_day)
    }

    /// Cycle day and phase of a calendar date.
    pub fn phase_for_date(
        &self,
        target: NaiveDate,
        anchor: NaiveDate,
        cycle_length: i64,
        bleed_days: i64,
    ) -> (u32, Phase) {
        let day = self.cycle_day(target, anchor, cycle_length);
        (day, self.phase_of(day, cycle_length, bleed_days))
    }
}

/// Day boundaries of the four-phase model for one cycle shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBoundaries {
    pub cycle_length: u32,
    pub bleed_days: u32,
    pub ovulation_day: u32,
    pub ovulation_window_start: u32,
    pub ovulation_window_end: u32,
}

impl PhaseBoundaries {
    /// Compute boundaries for already-resolved (positive) inputs.
    pub fn new(cycle_length: u32, bleed_days: u32) -> Self {
        let ovulation_day = cycle_length / 2;
        let late_follicular_start = bleed_days.saturating_add(1);
        let ovulation_window_start =
            ovulation_day.saturating_sub(1).max(late_follicular_start.saturating_add(1));
        Self {
            cycle_length,
            bleed_days,
            ovulation_day,
            ovulation_window_start,
            ovulation_window_end: ovulation_day + 1,
        }
    }

    /// Four-way rule, evaluated in fixed order.
    pub fn phase_at(&self, cycle_day: u32) -> Phase {
        if cycle_day <= self.bleed_days {
            Phase::Menstrual
        } else if cycle_day < self.ovulation_window_start {
            Phase::Follicular
        } else if cycle_day <= self.ovulation_window_end {
            Phase::Ovulation
        } else {
            Phase::Luteal
        }
    }

    /// Inclusive day range each phase occupies within the cycle.
    ///
    /// Phases that get no day for this cycle shape are omitted.
    pub fn ranges(&self) -> Vec<(Phase, u32, u32)> {
        let after_bleed = self.bleed_days.saturating_add(1);
        let ovulation_start = self.ovulation_window_start.max(after_bleed);
        let luteal_start = ovulation_start.max(self.ovulation_window_end.saturating_add(1));
        [
            (Phase::Menstrual, 1, self.bleed_days),
            (
                Phase::Follicular,
                after_bleed,
                self.ovulation_window_start.saturating_sub(1),
            ),
            (Phase::Ovulation, ovulation_start, self.ovulation_window_end),
            (Phase::Luteal, luteal_start, self.cycle_length),
        ]
        .into_iter()
        .map(|(phase, start, end)| (phase, start, end.min(self.cycle_length)))
        .filter(|(_, start, end)| start <= end)
        .collect()
    }
}

/// Cycle day using the default coercion policy.
pub fn cycle_day(target: NaiveDate, anchor: NaiveDate, cycle_length: i64) -> u32 {
    CoercionPolicy::default().cycle_day(target, anchor, cycle_length)
}

/// Phase of a cycle day using the default coercion policy.
pub fn phase_of(cycle_day: u32, cycle_length: i64, bleed_days: i64) -> Phase {
    CoercionPolicy::default().phase_of(cycle_day, cycle_length, bleed_days)
}

/// Cycle day and phase of a date using the default coercion policy.
pub fn phase_for_date(
    target: NaiveDate,
    anchor: NaiveDate,
    cycle_length: i64,
    bleed_days: i64,
) -> (u32, Phase) {
    CoercionPolicy::default().phase_for_date(target, anchor, cycle_length, bleed_days)
}
