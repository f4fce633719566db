use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cycleplan", version, about = "Cycleplan CLI")]
struct Cli {
    /// Config file (defaults to ~/.config/cycleplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cycle day, phase and tips for a date
    Phase(commands::phase::PhaseArgs),
    /// Workout intensity recommendation
    Workout(commands::workout::WorkoutArgs),
    /// Check a task list against the cycle and suggest better slots
    Plan(commands::plan::PlanArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CYCLEPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config_path = cli.config.as_ref();

    let result = match cli.command {
        Commands::Phase(args) => {
            commands::load_config(config_path).and_then(|config| commands::phase::run(args, &config))
        }
        Commands::Workout(args) => {
            commands::load_config(config_path).and_then(|config| commands::workout::run(args, &config))
        }
        Commands::Plan(args) => {
            commands::load_config(config_path).and_then(|config| commands::plan::run(args, &config))
        }
        Commands::Config { action } => commands::config::run(action, config_path),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cycleplan", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
