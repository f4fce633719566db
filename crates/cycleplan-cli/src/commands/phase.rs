//! Cycle summary command.

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use cycleplan_core::{summarize, Config, CycleSummary, PhaseBoundaries};

use super::{date_or_today, ProfileArgs};

#[derive(Args, Debug)]
pub struct PhaseArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// Date to summarize (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PhaseOutput {
    #[serde(flatten)]
    summary: CycleSummary,
    boundaries: PhaseBoundaries,
}

pub fn run(args: PhaseArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let profile = args.profile.resolve()?;
    let policy = config.coercion_policy();
    let today = date_or_today(args.date);

    let resolved = policy.resolve(profile.cycle_length, profile.bleed_days);
    for coercion in &resolved.coercions {
        tracing::info!(
            field = ?coercion.field,
            given = coercion.given,
            substituted = coercion.substituted,
            "using default"
        );
    }
    let boundaries = PhaseBoundaries::new(resolved.cycle_length, resolved.bleed_days);
    let summary = summarize(&profile, today, &policy);

    if args.json {
        let output = PhaseOutput {
            summary,
            boundaries,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}  (cycle day {} of {})", summary.today, summary.cycle_day, resolved.cycle_length);
    println!("{}", summary.phase_label);
    println!();
    println!("  {}", summary.tips.headline);
    for item in &summary.tips.do_items {
        println!("  + {item}");
    }
    for item in &summary.tips.avoid {
        println!("  - {item}");
    }
    println!();
    println!("Phases this cycle:");
    for (phase, start, end) in boundaries.ranges() {
        println!("  {:<11} days {start:>2}-{end:<2}", phase.to_string());
    }
    Ok(())
}
