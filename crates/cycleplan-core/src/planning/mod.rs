//! Task planning against the cycle.
//!
//! This module provides:
//! - Category to compatible-phase rules
//! - The plan evaluator with its bounded alternate-slot search
//! - Conversion of calendar events into plannable tasks

mod evaluator;
mod events;
mod rules;

pub use evaluator::{
    parse_task_start, PlanEvaluator, PlanSuggestion, SearchWindow, Task, Verdict,
};
pub use events::{classify_event_title, CalendarEvent, EventStart, DEFAULT_EVENT_MINUTES};
pub use rules::{target_phases, CategoryGroup};
