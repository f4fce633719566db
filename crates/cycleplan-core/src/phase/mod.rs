//! Cycle phase mapping.
//!
//! This module provides:
//! - The four-phase model and its tag parsing
//! - Date to cycle-day arithmetic with floored modulo
//! - The explicit default-substitution policy for degenerate inputs
//! - Static labels and care tips per phase

mod mapper;
mod metadata;

pub use mapper::{
    cycle_day, phase_for_date, phase_of, CoercedField, Coercion, CoercionPolicy,
    PhaseBoundaries, ResolvedCycle, DEFAULT_BLEED_DAYS, DEFAULT_CYCLE_LENGTH,
};
pub use metadata::{label_for_tag, label_of, tips_for_tag, tips_of, PhaseTips};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four named intervals of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 4] = [
        Phase::Menstrual,
        Phase::Follicular,
        Phase::Ovulation,
        Phase::Luteal,
    ];

    /// Lowercase tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menstrual => "menstrual",
            Phase::Follicular => "follicular",
            Phase::Ovulation => "ovulation",
            Phase::Luteal => "luteal",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag names none of the four phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPhase(pub String);

impl fmt::Display for UnknownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown phase '{}'", self.0)
    }
}

impl std::error::Error for UnknownPhase {}

impl FromStr for Phase {
    type Err = UnknownPhase;

    /// Case-insensitive; accepts "ovulatory" as used by the decision table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "menstrual" => Ok(Phase::Menstrual),
            "follicular" => Ok(Phase::Follicular),
            "ovulation" | "ovulatory" => Ok(Phase::Ovulation),
            "luteal" => Ok(Phase::Luteal),
            _ => Err(UnknownPhase(s.to_string())),
        }
    }
}
