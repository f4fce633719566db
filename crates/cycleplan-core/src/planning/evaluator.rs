//! Plan evaluator.
//!
//! For every task the evaluator checks whether the phase on the task's date
//! is compatible with its category. Incompatible tasks get a greedy search
//! over a fixed window of day offsets: candidates are visited in ascending
//! offset order and the first compatible one wins, so an earlier date beats
//! an equally distant later one only because it is visited first.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::RangeInclusive;

use super::rules::CategoryGroup;
use crate::error::ValidationError;
use crate::phase::{CoercionPolicy, Phase};
use crate::profile::CycleProfile;

/// Offsets (in days) searched around an incompatible task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub before_days: u32,
    pub after_days: u32,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            before_days: 3,
            after_days: 7,
        }
    }
}

impl SearchWindow {
    /// Offsets in scan order, from `-before_days` to `+after_days`.
    pub fn offsets(&self) -> RangeInclusive<i64> {
        -i64::from(self.before_days)..=i64::from(self.after_days)
    }
}

/// A task to be placed in the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub category: String,
    #[serde(deserialize_with = "deserialize_start")]
    pub start: NaiveDateTime,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

fn default_duration_minutes() -> u32 {
    60
}

fn deserialize_start<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_task_start(&raw).map_err(serde::de::Error::custom)
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: u32,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            start,
            duration_minutes,
        }
    }
}

/// Parse an ISO-8601 task start.
///
/// RFC 3339 inputs keep their wall-clock time and drop the offset; naive
/// date-times and bare dates (midnight) are accepted as well.
pub fn parse_task_start(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(ValidationError::InvalidDateTime {
        value: value.to_string(),
    })
}

/// Outcome for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The original slot already fits.
    Ideal,
    /// A compatible slot was found inside the search window.
    Reschedule {
        suggested_start: NaiveDateTime,
        suggested_end: NaiveDateTime,
        suggested_phase: Phase,
        offset_days: i64,
    },
    /// Not ideal, and nothing in the window fits either.
    NoBetterSlot,
}

/// Plan-evaluation recommendation for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSuggestion {
    pub title: String,
    pub category: String,
    pub original_start: NaiveDateTime,
    pub phase_at_original: Phase,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub reason: String,
}

impl PlanSuggestion {
    pub fn is_ideal(&self) -> bool {
        matches!(self.verdict, Verdict::Ideal)
    }

    pub fn suggested_start(&self) -> Option<NaiveDateTime> {
        match self.verdict {
            Verdict::Reschedule {
                suggested_start, ..
            } => Some(suggested_start),
            _ => None,
        }
    }

    pub fn suggested_phase(&self) -> Option<Phase> {
        match self.verdict {
            Verdict::Reschedule {
                suggested_phase, ..
            } => Some(suggested_phase),
            _ => None,
        }
    }
}

/// Evaluates task lists against a cycle profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanEvaluator {
    policy: CoercionPolicy,
    window: SearchWindow,
}

impl PlanEvaluator {
    pub fn new(policy: CoercionPolicy, window: SearchWindow) -> Self {
        Self { policy, window }
    }

    pub fn window(&self) -> SearchWindow {
        self.window
    }

    /// Evaluate tasks in order; one suggestion per task.
    pub fn evaluate(&self, profile: &CycleProfile, tasks: &[Task]) -> Vec<PlanSuggestion> {
        tasks
            .iter()
            .map(|task| self.evaluate_task(profile, task))
            .collect()
    }

    pub fn evaluate_task(&self, profile: &CycleProfile, task: &Task) -> PlanSuggestion {
        let group = CategoryGroup::from_category(&task.category);
        let (_, phase) = profile.phase_on(task.start.date(), &self.policy);

        let (verdict, reason) = if group.accepts(phase) {
            (
                Verdict::Ideal,
                format!(
                    "This fits well into your {phase} phase for a {} task.",
                    task.category
                ),
            )
        } else {
            match self.find_alternate(profile, task, group) {
                Some((offset_days, date, best)) => {
                    let suggested_start = date.and_time(task.start.time());
                    let suggested_end = suggested_start
                        .checked_add_signed(Duration::minutes(i64::from(task.duration_minutes)))
                        .unwrap_or(suggested_start);
                    (
                        Verdict::Reschedule {
                            suggested_start,
                            suggested_end,
                            suggested_phase: best,
                            offset_days,
                        },
                        format!(
                            "{} tasks tend to feel better in your {best} phase than in {phase}.",
                            capitalize(&task.category)
                        ),
                    )
                }
                None => (
                    Verdict::NoBetterSlot,
                    format!(
                        "This isn't in your ideal phase for {}, but we didn't find a clearly \
                         better slot in the next week.",
                        task.category
                    ),
                ),
            }
        };

        tracing::debug!(
            title = %task.title,
            category = %task.category,
            %phase,
            ?verdict,
            "evaluated task"
        );

        PlanSuggestion {
            title: task.title.clone(),
            category: task.category.clone(),
            original_start: task.start,
            phase_at_original: phase,
            verdict,
            reason,
        }
    }

    fn find_alternate(
        &self,
        profile: &CycleProfile,
        task: &Task,
        group: CategoryGroup,
    ) -> Option<(i64, NaiveDate, Phase)> {
        let original = task.start.date();
        self.window.offsets().find_map(|offset| {
            let candidate = original.checked_add_signed(Duration::days(offset))?;
            let (_, phase) = profile.phase_on(candidate, &self.policy);
            group.accepts(phase).then_some((offset, candidate, phase))
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
