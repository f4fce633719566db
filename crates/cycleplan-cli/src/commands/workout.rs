//! Workout intensity command.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

use cycleplan_core::{Config, CycleTemplate, Intensity};

use super::{date_or_today, ProfileArgs};

#[derive(Args, Debug)]
pub struct WorkoutArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// Desired intensity: light, moderate or heavy
    #[arg(long)]
    pub intensity: String,
    /// Workout date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Decision table CSV overriding the configured one
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: WorkoutArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let profile = args.profile.resolve()?;
    let template = match &args.template {
        Some(path) => CycleTemplate::from_path(path, config.template_options())?
            .with_rules(config.workout_rules()),
        None => config.load_template()?,
    };

    let date = date_or_today(args.date);
    let decision = template.decide_workout_for_date(
        profile.last_period_start,
        date,
        Some(profile.cycle_length),
        &config.coercion_policy(),
        Intensity::from(args.intensity.as_str()),
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    let heavy = if decision.ok_to_do_heavy { "yes" } else { "no" };
    println!("{date}  (cycle day {}, {})", decision.cycle_day, decision.cycle_phase);
    println!("  Requested:   {}", decision.desired_intensity);
    println!("  Recommended: {}", decision.recommended_intensity);
    println!("  Band:        {}", decision.base_intensity_pattern);
    println!("  Heavy ok:    {heavy}");
    println!(
        "  Energy {}/5, rest need {}/5",
        decision.energy_level, decision.rest_need
    );
    if !decision.symptoms.is_empty() {
        println!("  Expected:    {}", decision.symptoms.join(", "));
    }
    println!();
    println!("{}", decision.reason);
    Ok(())
}
