//! Request-level facade over the engine.
//!
//! A [`CycleService`] owns the decision table (loaded once, shared through
//! an `Arc`) and reads profiles through a [`ProfileRepository`]. All methods
//! take `&self` and hold no mutable state, so one service can serve
//! concurrent callers.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::{ProfileError, Result};
use crate::phase::CoercionPolicy;
use crate::planning::{PlanEvaluator, PlanSuggestion, SearchWindow, Task};
use crate::profile::{CycleProfile, ProfileRepository};
use crate::storage::Config;
use crate::summary::{summarize, CycleSummary};
use crate::template::{CycleTemplate, Intensity, WorkoutDecision};

pub struct CycleService<R> {
    repository: R,
    template: Arc<CycleTemplate>,
    policy: CoercionPolicy,
    evaluator: PlanEvaluator,
}

impl<R: ProfileRepository> CycleService<R> {
    pub fn new(
        repository: R,
        template: Arc<CycleTemplate>,
        policy: CoercionPolicy,
        window: SearchWindow,
    ) -> Self {
        Self {
            repository,
            template,
            policy,
            evaluator: PlanEvaluator::new(policy, window),
        }
    }

    /// Build from configuration, loading the decision table once.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured decision table cannot be loaded.
    pub fn from_config(repository: R, config: &Config) -> Result<Self> {
        let template = Arc::new(config.load_template()?);
        Ok(Self::new(
            repository,
            template,
            config.coercion_policy(),
            config.search_window(),
        ))
    }

    pub fn template(&self) -> &Arc<CycleTemplate> {
        &self.template
    }

    fn cycle_profile(&self, user_id: &str) -> Result<CycleProfile> {
        let record = self
            .repository
            .profile(user_id)?
            .ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.to_string(),
            })?;
        Ok(record.to_cycle_profile()?)
    }

    /// Cycle day, phase and tips for a user on `today`.
    pub fn cycle_summary(&self, user_id: &str, today: NaiveDate) -> Result<CycleSummary> {
        let profile = self.cycle_profile(user_id)?;
        Ok(summarize(&profile, today, &self.policy))
    }

    /// Evaluate a user's task list.
    pub fn evaluate_plan(&self, user_id: &str, tasks: &[Task]) -> Result<Vec<PlanSuggestion>> {
        let profile = self.cycle_profile(user_id)?;
        Ok(self.evaluator.evaluate(&profile, tasks))
    }

    /// Workout decision for a user on `date`.
    pub fn decide_workout(
        &self,
        user_id: &str,
        date: NaiveDate,
        desired: impl Into<Intensity>,
    ) -> Result<WorkoutDecision> {
        let profile = self.cycle_profile(user_id)?;
        Ok(self.template.decide_workout_for_date(
            profile.last_period_start,
            date,
            Some(profile.cycle_length),
            &self.policy,
            desired,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::profile::{InMemoryProfiles, ProfileRecord};

    fn service() -> CycleService<InMemoryProfiles> {
        let mut repo = InMemoryProfiles::new();
        repo.upsert(ProfileRecord {
            user_id: "ada".into(),
            last_period_start: Some("2025-01-01".into()),
            cycle_length: Some(28),
            menstruation_phase_duration: Some(5),
        });
        repo.upsert(ProfileRecord {
            user_id: "long".into(),
            last_period_start: Some("2025-01-01".into()),
            cycle_length: Some(35),
            menstruation_phase_duration: Some(5),
        });
        repo.upsert(ProfileRecord {
            user_id: "new".into(),
            ..Default::default()
        });
        CycleService::from_config(repo, &Config::default()).unwrap()
    }

    #[test]
    fn summary_for_known_user() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let summary = service().cycle_summary("ada", today).unwrap();
        assert_eq!(summary.cycle_day, 10);
    }

    #[test]
    fn unknown_and_incomplete_profiles_fail() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let svc = service();
        assert!(matches!(
            svc.cycle_summary("ghost", today),
            Err(CoreError::Profile(ProfileError::NotFound { .. }))
        ));
        assert!(matches!(
            svc.evaluate_plan("new", &[]),
            Err(CoreError::Profile(ProfileError::Incomplete { .. }))
        ));
    }

    #[test]
    fn workout_for_user_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let decision = service().decide_workout("ada", date, "heavy").unwrap();
        assert_eq!(decision.cycle_day, 1);
        assert_eq!(decision.recommended_intensity, Intensity::Light);
    }

    #[test]
    fn workout_and_summary_agree_on_long_cycles() {
        let svc = service();
        let date = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let summary = svc.cycle_summary("long", date).unwrap();
        let decision = svc.decide_workout("long", date, "light").unwrap();
        assert_eq!(summary.cycle_day, 6);
        assert_eq!(decision.cycle_day, summary.cycle_day);
        assert_eq!(decision.cycle_phase, summary.phase);
    }

    #[test]
    fn service_is_shareable_across_threads() {
        let svc = service();
        let today = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| svc.cycle_summary("ada", today).unwrap().cycle_day))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 14);
            }
        });
    }
}
