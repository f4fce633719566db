//! Template-driven per-cycle-day decision table.
//!
//! The table is loaded once from CSV, indexed by cycle day and then shared
//! read-only. Load failures are configuration errors; a missing row at query
//! time is a per-call [`TemplateError::NotFound`].
//!
//! Expected columns (extra columns are ignored):
//!
//! | column               | meaning                                   |
//! |----------------------|-------------------------------------------|
//! | `Cycle_Day`          | 1-based day key                           |
//! | `Cycle_Phase`        | Menstrual / Follicular / Ovulatory / Luteal |
//! | `Energy_Level_1to5`  | predicted energy, empty means 3           |
//! | `Rest_Need_1to5`     | predicted rest need, empty means 3        |
//! | `Expected_Symptoms`  | comma-separated tags                      |

mod intensity;

pub use intensity::{Intensity, IntensityBand, WorkoutDecision, WorkoutRules};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::TemplateError;
use crate::phase::{Phase, DEFAULT_CYCLE_LENGTH};

const BUILTIN_TEMPLATE: &str = include_str!("../../data/cycle_template.csv");

/// Level assumed when an energy or rest cell is empty.
const NEUTRAL_LEVEL: u8 = 3;

/// One day of the decision table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRow {
    pub cycle_day: u32,
    pub phase: Phase,
    /// Predicted energy (1-5)
    pub energy_level: u8,
    /// Predicted rest need (1-5)
    pub rest_need: u8,
    pub symptoms: Vec<String>,
}

/// Load-time options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateOptions {
    pub cycle_length: u32,
    /// Reject tables that leave any day of the cycle without a row.
    pub require_complete: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            require_complete: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Cycle_Day", default)]
    cycle_day: Option<String>,
    #[serde(rename = "Cycle_Phase", default)]
    phase: Option<String>,
    #[serde(rename = "Energy_Level_1to5", default)]
    energy: Option<String>,
    #[serde(rename = "Rest_Need_1to5", default)]
    rest: Option<String>,
    #[serde(rename = "Expected_Symptoms", default)]
    symptoms: Option<String>,
}

impl RawRow {
    fn into_row(self, line: u64) -> Result<(i64, TemplateRow), TemplateError> {
        let day_raw = self
            .cycle_day
            .filter(|s| !s.trim().is_empty())
            .ok_or(TemplateError::MissingCycleDay { line })?;
        let day: i64 = day_raw
            .trim()
            .parse()
            .map_err(|_| TemplateError::InvalidField {
                line,
                column: "Cycle_Day",
                message: format!("'{day_raw}' is not an integer"),
            })?;

        let phase_raw = self.phase.unwrap_or_default();
        let phase = phase_raw
            .parse::<Phase>()
            .map_err(|e| TemplateError::InvalidField {
                line,
                column: "Cycle_Phase",
                message: e.to_string(),
            })?;

        let row = TemplateRow {
            cycle_day: 0,
            phase,
            energy_level: parse_level(self.energy, line, "Energy_Level_1to5")?,
            rest_need: parse_level(self.rest, line, "Rest_Need_1to5")?,
            symptoms: split_symptoms(self.symptoms.as_deref().unwrap_or("")),
        };
        Ok((day, row))
    }
}

fn parse_level(
    raw: Option<String>,
    line: u64,
    column: &'static str,
) -> Result<u8, TemplateError> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(NEUTRAL_LEVEL),
    };
    match raw.trim().parse::<u8>() {
        Ok(level @ 1..=5) => Ok(level),
        _ => Err(TemplateError::InvalidField {
            line,
            column,
            message: format!("'{raw}' is not a level between 1 and 5"),
        }),
    }
}

fn split_symptoms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Wrap any integer into `1..=cycle_length` with floored modulo.
pub fn normalize_day(cycle_day: i64, cycle_length: u32) -> u32 {
    let len = i64::from(cycle_length.max(1));
    ((cycle_day - 1).rem_euclid(len) + 1) as u32
}

/// Immutable per-day decision table.
#[derive(Debug, Clone)]
pub struct CycleTemplate {
    cycle_length: u32,
    rows: BTreeMap<u32, TemplateRow>,
    rules: WorkoutRules,
}

impl CycleTemplate {
    /// The 28-day table shipped with the library.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::from_reader(BUILTIN_TEMPLATE.as_bytes(), TemplateOptions::default())
    }

    /// Load a CSV file.
    pub fn from_path(path: &Path, options: TemplateOptions) -> Result<Self, TemplateError> {
        let file = std::fs::File::open(path)
            .map_err(|e| TemplateError::Unreadable(format!("{}: {e}", path.display())))?;
        Self::from_reader(file, options)
    }

    /// Load CSV from any reader.
    pub fn from_reader<R: Read>(reader: R, options: TemplateOptions) -> Result<Self, TemplateError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| TemplateError::Unreadable(e.to_string()))?
            .clone();

        let mut parsed = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| TemplateError::Unreadable(e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let raw: RawRow = record
                .deserialize(Some(&headers))
                .map_err(|e| TemplateError::Unreadable(e.to_string()))?;
            parsed.push(raw.into_row(line)?);
        }
        Self::build(parsed, options)
    }

    /// Build from already-parsed rows keyed by their `cycle_day`.
    pub fn from_rows(rows: Vec<TemplateRow>, options: TemplateOptions) -> Result<Self, TemplateError> {
        let keyed = rows
            .into_iter()
            .map(|row| (i64::from(row.cycle_day), row))
            .collect();
        Self::build(keyed, options)
    }

    fn build(rows: Vec<(i64, TemplateRow)>, options: TemplateOptions) -> Result<Self, TemplateError> {
        if rows.is_empty() {
            return Err(TemplateError::Empty);
        }
        let cycle_length = if options.cycle_length == 0 {
            DEFAULT_CYCLE_LENGTH
        } else {
            options.cycle_length
        };

        let mut by_day = BTreeMap::new();
        for (day, mut row) in rows {
            if day < 1 || day > i64::from(cycle_length) {
                return Err(TemplateError::DayOutOfRange { day, cycle_length });
            }
            let day = day as u32;
            row.cycle_day = day;
            if by_day.insert(day, row).is_some() {
                return Err(TemplateError::DuplicateDay(day));
            }
        }

        let missing: Vec<u32> = (1..=cycle_length)
            .filter(|d| !by_day.contains_key(d))
            .collect();
        if !missing.is_empty() {
            if options.require_complete {
                return Err(TemplateError::MissingDays(missing));
            }
            tracing::warn!(?missing, "cycle template has gaps");
        }

        tracing::debug!(rows = by_day.len(), cycle_length, "loaded cycle template");
        Ok(Self {
            cycle_length,
            rows: by_day,
            rules: WorkoutRules::default(),
        })
    }

    /// Replace the workout override rules.
    pub fn with_rules(mut self, rules: WorkoutRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &WorkoutRules {
        &self.rules
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in cycle-day order.
    /// Wrap any integer into this table's cycle.
    pub fn normalize_day(&self, cycle_day: i64) -> u32 {
        normalize_day(cycle_day, self.cycle_length)
    }

    /// Row for a (possibly out-of-range) cycle day.
    pub fn row_for(&self, cycle_day: i64) -> Result<&TemplateRow, TemplateError> {
        let normalized = self.normalize_day(cycle_day);
        self.rows
            .get(&normalized)
            .ok_or(TemplateError::NotFound {
                cycle_day: normalized,
            })
    }

    /// Zero-based position of `day` inside the contiguous run of its phase,
    /// and the length of that run.
    fn phase_run_position(&self, row: &TemplateRow) -> (u32, u32) {
        let same = |d: u32| self.rows.get(&d).is_some_and(|r| r.phase == row.phase);
        let mut start = row.cycle_day;
        while start > 1 && same(start - 1) {
            start -= 1;
        }
        let mut end = row.cycle_day;
        while end < self.cycle_length && same(end + 1) {
            end += 1;
        }
        (row.cycle_day - start, end - start + 1)
    }
}
