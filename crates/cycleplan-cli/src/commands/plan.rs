//! Plan evaluation command.

use std::path::PathBuf;

use clap::Args;

use cycleplan_core::{CalendarEvent, Config, PlanEvaluator, Task, Verdict};

use super::ProfileArgs;

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// JSON array of tasks: {title, category, start, duration_minutes}
    #[arg(long, required_unless_present = "events", conflicts_with = "events")]
    pub tasks: Option<PathBuf>,
    /// JSON array of calendar events; categories are derived from titles
    #[arg(long)]
    pub events: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn read_tasks(args: &PlanArgs) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.tasks {
        let content = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }
    let path = args.events.as_ref().ok_or("--tasks or --events is required")?;
    let content = std::fs::read_to_string(path)?;
    let events: Vec<CalendarEvent> = serde_json::from_str(&content)?;
    Ok(events.iter().map(CalendarEvent::to_task).collect())
}

pub fn run(args: PlanArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let profile = args.profile.resolve()?;
    let tasks = read_tasks(&args)?;
    let evaluator = PlanEvaluator::new(config.coercion_policy(), config.search_window());
    let suggestions = evaluator.evaluate(&profile, &tasks);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No tasks to evaluate.");
        return Ok(());
    }

    for suggestion in &suggestions {
        let mark = if suggestion.is_ideal() { "ok" } else { "!!" };
        println!(
            "[{mark}] {} ({}) {} - {}",
            suggestion.title,
            suggestion.category,
            suggestion.original_start.format("%Y-%m-%d %H:%M"),
            suggestion.phase_at_original
        );
        if let Verdict::Reschedule {
            suggested_start,
            suggested_phase,
            offset_days,
            ..
        } = &suggestion.verdict
        {
            println!(
                "     try {} ({suggested_phase}, {offset_days:+} days)",
                suggested_start.format("%Y-%m-%d %H:%M")
            );
        }
        println!("     {}", suggestion.reason);
    }
    Ok(())
}
