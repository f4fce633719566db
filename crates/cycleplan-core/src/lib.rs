//! # Cycleplan Core Library
//!
//! This library provides the cycle-phase decision engine: it maps calendar
//! dates onto menstrual-cycle phases and turns phases into recommendations.
//! A standalone CLI binary exposes the same operations.
//!
//! ## Architecture
//!
//! - **Phase Mapper**: date to cycle day (floored modulo) to phase, with an
//!   explicit default-substitution policy for degenerate inputs
//! - **Decision Table**: per-cycle-day template loaded once from CSV that drives
//!   workout-intensity decisions
//! - **Planning**: category/phase compatibility rules and a plan evaluator with
//!   a bounded alternate-slot search
//! - **Storage**: TOML-based configuration and the profile repository seam
//!
//! ## Key Components
//!
//! - [`CoercionPolicy`]: Phase mapping with observable default substitution
//! - [`CycleTemplate`]: Immutable decision table
//! - [`PlanEvaluator`]: Task compatibility and alternate-slot search
//! - [`CycleService`]: Request facade over a [`ProfileRepository`]
//! - [`Config`]: Application configuration management

pub mod error;
pub mod phase;
pub mod planning;
pub mod profile;
pub mod service;
pub mod storage;
pub mod summary;
pub mod template;

pub use error::{ConfigError, CoreError, ProfileError, TemplateError, ValidationError};
pub use phase::{cycle_day, phase_of, CoercionPolicy, Phase, PhaseBoundaries, PhaseTips};
pub use planning::{
    classify_event_title, target_phases, CalendarEvent, CategoryGroup, PlanEvaluator,
    PlanSuggestion, SearchWindow, Task, Verdict,
};
pub use profile::{CycleProfile, InMemoryProfiles, JsonFileProfiles, ProfileRecord, ProfileRepository};
pub use service::CycleService;
pub use storage::Config;
pub use summary::{summarize, CycleSummary};
pub use template::{
    normalize_day, CycleTemplate, Intensity, IntensityBand, TemplateOptions, TemplateRow,
    WorkoutDecision, WorkoutRules,
};
