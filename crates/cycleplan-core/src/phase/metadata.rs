//! Static labels and care tips per phase.

use serde::{Deserialize, Serialize};

use super::Phase;

/// Short, friendly guidance for a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTips {
    pub headline: String,
    #[serde(rename = "do")]
    pub do_items: Vec<String>,
    pub avoid: Vec<String>,
}

impl PhaseTips {
    fn from_static(headline: &str, do_items: &[&str], avoid: &[&str]) -> Self {
        Self {
            headline: headline.to_string(),
            do_items: do_items.iter().map(|s| s.to_string()).collect(),
            avoid: avoid.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Entry used for tags that name no known phase.
    pub fn generic() -> Self {
        Self::from_static(
            "Tune into how you feel today.",
            &["Notice your energy and adjust where you can."],
            &[],
        )
    }
}

/// Display label for a phase.
pub fn label_of(phase: Phase) -> &'static str {
    match phase {
        Phase::Menstrual => "Menstrual phase",
        Phase::Follicular => "Follicular phase",
        Phase::Ovulation => "Ovulation window",
        Phase::Luteal => "Luteal phase",
    }
}

/// Care tips for a phase.
pub fn tips_of(phase: Phase) -> PhaseTips {
    match phase {
        Phase::Menstrual => PhaseTips::from_static(
            "Low-energy, high-care days.",
            &[
                "Prioritise rest and low-pressure work.",
                "Block focused time for small, concrete tasks.",
                "Favour gentle movement: walks, stretching, yoga.",
            ],
            &[
                "Overloading your calendar with back-to-back meetings.",
                "Scheduling heavy workouts or intense social events.",
            ],
        ),
        Phase::Follicular => PhaseTips::from_static(
            "Brain is sharp, energy is climbing.",
            &[
                "Plan deep-work blocks and heavy study sessions.",
                "Start new projects and brainstorming sessions.",
                "Schedule strength or higher-intensity workouts.",
            ],
            &["Leaving important tasks for much later in the cycle."],
        ),
        Phase::Ovulation => PhaseTips::from_static(
            "Peak visibility & social energy.",
            &[
                "Schedule presentations, networking, and social plans.",
                "Batch calls and collaborative work.",
                "Use your high energy for ambitious workouts.",
            ],
            &["Hiding high-stakes tasks in low-energy days instead."],
        ),
        Phase::Luteal => PhaseTips::from_static(
            "Energy slowly dips, detail-oriented mode.",
            &[
                "Tidy up tasks, documents, and code.",
                "Plan admin, reviews, and low-pressure work.",
                "Prioritise sleep and calmer movement.",
            ],
            &[
                "Overcommitting to last-minute high-social events.",
                "Scheduling big deadlines right before your period starts.",
            ],
        ),
    }
}

/// Label lookup by raw tag, falling back to "Unknown phase".
pub fn label_for_tag(tag: &str) -> &'static str {
    tag.parse::<Phase>().map(label_of).unwrap_or("Unknown phase")
}

/// Tips lookup by raw tag, falling back to the generic entry.
pub fn tips_for_tag(tag: &str) -> PhaseTips {
    tag.parse::<Phase>()
        .map(tips_of)
        .unwrap_or_else(|_| PhaseTips::generic())
}
