pub mod config;
pub mod phase;
pub mod plan;
pub mod workout;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;

use cycleplan_core::storage::data_dir;
use cycleplan_core::{Config, CycleProfile, JsonFileProfiles, ProfileError, ProfileRepository};

/// Where the cycle profile comes from: explicit flags or a stored profile.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Start of the last period (YYYY-MM-DD)
    #[arg(long, required_unless_present = "user")]
    pub anchor: Option<NaiveDate>,
    /// Cycle length in days; non-positive values use the configured default
    #[arg(long, default_value_t = 28, allow_negative_numbers = true)]
    pub cycle_length: i64,
    /// Menstrual phase length in days; non-positive values use the configured default
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub bleed_days: i64,
    /// Read the profile of this user from the profiles file instead
    #[arg(long, conflicts_with = "anchor")]
    pub user: Option<String>,
    /// Profiles JSON file (defaults to ~/.config/cycleplan/profiles.json)
    #[arg(long, requires = "user")]
    pub profiles: Option<PathBuf>,
}

impl ProfileArgs {
    pub fn resolve(&self) -> Result<CycleProfile, Box<dyn std::error::Error>> {
        if let Some(user_id) = &self.user {
            let path = match &self.profiles {
                Some(path) => path.clone(),
                None => data_dir()?.join("profiles.json"),
            };
            let repo = JsonFileProfiles::open(&path)?;
            let record = repo.profile(user_id)?.ok_or_else(|| ProfileError::NotFound {
                user_id: user_id.clone(),
            })?;
            return Ok(record.to_cycle_profile()?);
        }

        let anchor = self.anchor.ok_or("--anchor is required")?;
        Ok(CycleProfile::new(anchor)
            .with_cycle_length(self.cycle_length)
            .with_bleed_days(self.bleed_days))
    }
}

/// The given date, or today in local time.
pub fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Load the config from an explicit file (defaults when it does not exist yet)
/// or from the default location.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(_) => Config::default(),
        None => Config::load()?,
    })
}
