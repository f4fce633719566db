//! Category to compatible-phase rules.

use serde::{Deserialize, Serialize};

use crate::phase::Phase;

const FOLLICULAR_OVULATION: &[Phase] = &[Phase::Follicular, Phase::Ovulation];
const ACTIVE: &[Phase] = &[Phase::Follicular, Phase::Ovulation, Phase::Luteal];
const RESTFUL: &[Phase] = &[Phase::Menstrual, Phase::Luteal];

/// Group of task categories sharing one compatibility set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    /// social, dating, networking
    Social,
    /// work, uni, study, deep_work
    Work,
    /// sport, workout, exercise
    Sport,
    /// selfcare, rest
    SelfCare,
    /// Anything else; compatible with every phase.
    Other,
}

impl CategoryGroup {
    /// Case-insensitive category lookup.
    pub fn from_category(category: &str) -> Self {
        match category.trim().to_lowercase().as_str() {
            "social" | "dating" | "networking" => CategoryGroup::Social,
            "work" | "uni" | "study" | "deep_work" => CategoryGroup::Work,
            "sport" | "workout" | "exercise" => CategoryGroup::Sport,
            "selfcare" | "rest" => CategoryGroup::SelfCare,
            _ => CategoryGroup::Other,
        }
    }

    /// Phases in which tasks of this group usually fit best.
    pub fn target_phases(&self) -> &'static [Phase] {
        match self {
            CategoryGroup::Social | CategoryGroup::Sport => FOLLICULAR_OVULATION,
            CategoryGroup::Work => ACTIVE,
            CategoryGroup::SelfCare => RESTFUL,
            CategoryGroup::Other => &Phase::ALL,
        }
    }

    pub fn accepts(&self, phase: Phase) -> bool {
        self.target_phases().contains(&phase)
    }
}

/// Compatible phases for a raw category string.
pub fn target_phases(category: &str) -> &'static [Phase] {
    CategoryGroup::from_category(category).target_phases()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_map_to_their_groups() {
        assert_eq!(target_phases("social"), FOLLICULAR_OVULATION);
        assert_eq!(target_phases("Dating"), FOLLICULAR_OVULATION);
        assert_eq!(target_phases("NETWORKING"), FOLLICULAR_OVULATION);
        assert_eq!(target_phases("deep_work"), ACTIVE);
        assert_eq!(target_phases("uni"), ACTIVE);
        assert_eq!(target_phases("exercise"), FOLLICULAR_OVULATION);
        assert_eq!(target_phases("selfcare"), RESTFUL);
        assert_eq!(target_phases("rest"), RESTFUL);
    }

    #[test]
    fn unknown_categories_accept_every_phase() {
        assert_eq!(target_phases("groceries"), &Phase::ALL);
        assert_eq!(target_phases(""), &Phase::ALL);
        for phase in Phase::ALL {
            assert!(CategoryGroup::Other.accepts(phase));
        }
    }

    #[test]
    fn work_rejects_only_menstrual() {
        let work = CategoryGroup::from_category(" Work ");
        assert_eq!(work, CategoryGroup::Work);
        assert!(!work.accepts(Phase::Menstrual));
        assert!(work.accepts(Phase::Luteal));
    }
}
