//! Calendar events as plannable tasks.
//!
//! Calendar collaborators hand over events with free-text titles; a keyword
//! classifier picks a category so the events can run through the evaluator.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::evaluator::Task;

/// Duration assumed for events without an end.
pub const DEFAULT_EVENT_MINUTES: u32 = 60;

/// Hour assumed for all-day events.
const ALL_DAY_HOUR: u32 = 9;

const WORK_KEYWORDS: &[&str] = &["exam", "study", "lecture", "project"];
const SOCIAL_KEYWORDS: &[&str] = &["party", "drinks", "friend", "dinner"];

/// Category for an event title; unmatched titles count as work.
pub fn classify_event_title(title: &str) -> &'static str {
    let title = title.to_lowercase();
    if WORK_KEYWORDS.iter().any(|k| title.contains(k)) {
        "work"
    } else if SOCIAL_KEYWORDS.iter().any(|k| title.contains(k)) {
        "social"
    } else {
        "work"
    }
}

/// Start of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStart {
    DateTime(NaiveDateTime),
    AllDay(NaiveDate),
}

/// Calendar event as delivered by a calendar collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: EventStart,
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
}

impl CalendarEvent {
    /// Start instant; all-day events are placed at 09:00.
    pub fn start_at(&self) -> NaiveDateTime {
        match &self.start {
            EventStart::DateTime(dt) => *dt,
            EventStart::AllDay(date) => {
                date.and_time(NaiveTime::from_hms_opt(ALL_DAY_HOUR, 0, 0).unwrap_or(NaiveTime::MIN))
            }
        }
    }

    fn duration_minutes(&self) -> u32 {
        let start = self.start_at();
        match self.end {
            Some(end) if end > start => {
                u32::try_from((end - start).num_minutes()).unwrap_or(u32::MAX)
            }
            _ => DEFAULT_EVENT_MINUTES,
        }
    }

    /// Convert to a task with a keyword-derived category.
    pub fn to_task(&self) -> Task {
        let title = if self.summary.trim().is_empty() {
            "(no title)".to_string()
        } else {
            self.summary.clone()
        };
        Task::new(
            title,
            classify_event_title(&self.summary),
            self.start_at(),
            self.duration_minutes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn classifies_by_keyword() {
        assert_eq!(classify_event_title("Final EXAM prep"), "work");
        assert_eq!(classify_event_title("Birthday party"), "social");
        assert_eq!(classify_event_title("Dinner with Sam"), "social");
        assert_eq!(classify_event_title("Dentist"), "work");
        // Work keywords take precedence.
        assert_eq!(classify_event_title("Study group with friends"), "work");
    }

    #[test]
    fn timed_event_keeps_its_duration() {
        let event = CalendarEvent {
            id: "e1".into(),
            summary: "Drinks".into(),
            start: EventStart::DateTime(at(19, 0)),
            end: Some(at(21, 30)),
        };
        let task = event.to_task();
        assert_eq!(task.category, "social");
        assert_eq!(task.start, at(19, 0));
        assert_eq!(task.duration_minutes, 150);
    }

    #[test]
    fn all_day_event_starts_at_nine() {
        let event = CalendarEvent {
            id: "e2".into(),
            summary: "".into(),
            start: EventStart::AllDay(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()),
            end: None,
        };
        let task = event.to_task();
        assert_eq!(task.title, "(no title)");
        assert_eq!(task.start, at(9, 0));
        assert_eq!(task.duration_minutes, DEFAULT_EVENT_MINUTES);
    }
}
