//! Momentum CLI
//!
//! Runs scripted matches through the crowd momentum system and prints the
//! resulting momentum timeline.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use momentum_cli::{run_scenario, RunReport, Scenario};
#[cfg(feature = "cli")]
use momentum_core::MomentumConfig;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "momentum_cli")]
#[command(about = "Drive the crowd momentum system from scripted matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Realistic,
    Arcade,
    Simulation,
}

#[cfg(feature = "cli")]
impl Preset {
    fn config(self) -> MomentumConfig {
        match self {
            Preset::Realistic => MomentumConfig::realistic(),
            Preset::Arcade => MomentumConfig::arcade(),
            Preset::Simulation => MomentumConfig::simulation(),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run the built-in fourth-quarter demo
    Demo {
        /// Tuning preset
        #[arg(long, value_enum, default_value = "realistic")]
        preset: Preset,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Run a scenario file (JSON or YAML)
    Run {
        /// Scenario file path
        #[arg(long)]
        scenario: PathBuf,

        /// Config file overriding the preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// Tuning preset
        #[arg(long, value_enum, default_value = "realistic")]
        preset: Preset,

        /// Override the scenario's crowd seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print a preset as YAML
    Config {
        #[arg(long, value_enum, default_value = "realistic")]
        preset: Preset,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { preset, json } => {
            let report = run_scenario(&Scenario::demo(), &preset.config())?;
            print_report(&report, json)?;
        }

        Commands::Run {
            scenario,
            config,
            preset,
            seed,
            json,
            out,
        } => {
            let mut script = Scenario::load(&scenario)?;
            if let Some(seed) = seed {
                script.seed = seed;
            }
            let config = match config {
                Some(path) => MomentumConfig::load(&path)?,
                None => preset.config(),
            };

            let report = run_scenario(&script, &config)?;
            print_report(&report, json)?;

            if let Some(path) = out {
                std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
                println!("\nReport saved to: {}", path.display());
            }
        }

        Commands::Config { preset } => {
            print!("{}", serde_yaml::to_string(&preset.config())?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Scenario: {}", report.scenario);
    println!("Attendance: {}", report.attendance);

    println!("\nPlays:");
    for play in &report.plays {
        println!(
            "  {:>6.1}s  {:<40} impact {:>6.1}  home {:>+6.1}  away {:>+6.1}  effects {}",
            play.at, play.description, play.impact, play.home_delta, play.away_delta, play.effects_scheduled
        );
    }

    println!("\nTimeline:");
    println!(
        "  {:>6}  {:>3} {:>5}  {:>7} {:>7}  {:>9} {:>9}  {:>5}  {:>7}",
        "t", "Q", "clock", "home", "away", "home lvl", "away lvl", "noise", "effects"
    );
    for snap in &report.timeline {
        println!(
            "  {:>6.1}  {:>3} {:>2}:{:02}  {:>7.1} {:>7.1}  {:>9} {:>9}  {:>5.1}  {:>7}",
            snap.at,
            snap.quarter,
            snap.time_remaining / 60,
            snap.time_remaining % 60,
            snap.home_momentum,
            snap.away_momentum,
            format!("{:?}", snap.home_level),
            format!("{:?}", snap.away_level),
            snap.crowd_noise,
            snap.active_effects
        );
    }

    let last = &report.final_state;
    println!(
        "\nFinal: home {:.1} ({:?}), away {:.1} ({:?}), morale {:.0}/{:.0}",
        last.home_momentum,
        last.home_level,
        last.away_momentum,
        last.away_level,
        last.home_morale,
        last.away_morale
    );
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("momentum_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
