//! Vending Simulator CLI
//!
//! # Commands
//! - `vending-sim run` - Run a full simulation with a built-in policy
//! - `vending-sim resume <state>` - Continue a run saved with `--save`
//! - `vending-sim catalog` - Print products and suppliers

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vending_sim_core_rs::core::money::format_cents;
use vending_sim_core_rs::orchestrator::StateSnapshot;
use vending_sim_core_rs::policy::{AgentPolicyConfig, RestockConfig};
use vending_sim_core_rs::{Orchestrator, SimulationConfig, VendingAgent};

/// Vending machine simulator
#[derive(Parser)]
#[command(name = "vending-sim")]
#[command(author, version, about = "Run the vending machine day-cycle simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from day 1
    Run {
        #[command(flatten)]
        options: RunOptions,

        /// Simulation config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of days
        #[arg(long)]
        days: Option<u32>,
    },

    /// Continue a saved simulation
    Resume {
        /// State file written by `run --save`
        state: PathBuf,

        /// Config to check the state against (default: the one saved with it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Print the product and supplier tables
    Catalog {
        /// Simulation config JSON file (default: built-in catalog)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct RunOptions {
    /// Agent policy JSON file (overrides --strategy)
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Built-in strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::Restock)]
    strategy: Strategy,

    /// Stop after this many days and keep the run resumable
    #[arg(long)]
    stop_after: Option<u32>,

    /// Write the state here when the command finishes
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Idle,
    Restock,
}

/// State file contents: the run plus the config it was created with
#[derive(Serialize, Deserialize)]
struct SavedRun {
    config: SimulationConfig,
    snapshot: StateSnapshot,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,day_cycle=info,checkpoint=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            options,
            config,
            seed,
            days,
        } => {
            let sim = start_run(config.as_deref(), seed, days)?;
            drive(sim, &options).map(|_| ())
        }
        Commands::Resume {
            state,
            config,
            options,
        } => {
            let sim = resume_run(&state, config.as_deref())?;
            drive(sim, &options).map(|_| ())
        }
        Commands::Catalog { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", render::catalog(&config));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            SimulationConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(SimulationConfig::default()),
    }
}

fn start_run(config: Option<&Path>, seed: Option<u64>, days: Option<u32>) -> Result<Orchestrator> {
    let mut config = load_config(config)?;
    if let Some(seed) = seed {
        config.rng_seed = seed;
    }
    if let Some(days) = days {
        config.max_days = days;
    }
    config.validate().context("Invalid simulation config")?;
    Orchestrator::new(config).context("Failed to create simulation")
}

fn resume_run(state: &Path, config: Option<&Path>) -> Result<Orchestrator> {
    let json = fs::read_to_string(state)
        .with_context(|| format!("Failed to read state file {}", state.display()))?;
    let saved: SavedRun = serde_json::from_str(&json)
        .with_context(|| format!("Invalid state file {}", state.display()))?;

    let config = match config {
        Some(path) => load_config(Some(path))?,
        None => saved.config,
    };
    Orchestrator::from_snapshot(config, saved.snapshot)
        .context("Failed to restore simulation (was it saved with the same config?)")
}

fn save_run(sim: &Orchestrator, path: &Path) -> Result<()> {
    let saved = SavedRun {
        config: sim.config().clone(),
        snapshot: sim.snapshot().context("Failed to save state")?,
    };
    let json = serde_json::to_string(&saved)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write state file {}", path.display()))?;
    tracing::info!(target: "checkpoint", path = %path.display(), day = sim.current_day(), "state file written");
    Ok(())
}

fn build_agent(options: &RunOptions) -> Result<Box<dyn VendingAgent>> {
    let policy = match &options.policy {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read policy {}", path.display()))?;
            serde_json::from_str::<AgentPolicyConfig>(&json)
                .with_context(|| format!("Invalid policy {}", path.display()))?
        }
        None => match options.strategy {
            Strategy::Idle => AgentPolicyConfig::Idle,
            Strategy::Restock => AgentPolicyConfig::Restock(RestockConfig::default()),
        },
    };
    Ok(policy.build_agent())
}

/// Play days until the run ends or `--stop-after` is reached
fn drive(mut sim: Orchestrator, options: &RunOptions) -> Result<Orchestrator> {
    if sim.is_over() {
        bail!("Simulation already finished ({:?})", sim.outcome());
    }

    let mut agent = build_agent(options)?;
    tracing::info!(target: "day_cycle", run_id = %sim.run_id(), agent = agent.name(), "starting");

    let mut played = 0u32;
    while !sim.is_over() {
        if options.stop_after.is_some_and(|limit| played >= limit) {
            break;
        }
        let report = sim.run_day(agent.as_mut()).context("Day cycle failed")?;
        if !options.json {
            println!("{}", render::day_line(&report.summary));
        }
        played += 1;
    }

    if let Some(path) = &options.save {
        save_run(&sim, path)?;
        eprintln!("State saved to {}", path.display());
    }

    if sim.is_over() {
        let report = sim.report()?;
        if options.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", render::final_report(&report));
        }
    } else if !options.json {
        println!(
            "Paused after day {} with balance {}",
            sim.current_day(),
            format_cents(sim.balance())
        );
    }

    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vending_sim_core_rs::Outcome;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    fn run_options(args: &[&str]) -> RunOptions {
        let mut full = vec!["vending-sim", "resume", "unused.json"];
        full.extend_from_slice(args);
        match parse(&full) {
            Commands::Resume { options, .. } => options,
            _ => panic!("expected resume"),
        }
    }

    #[test]
    fn test_run_flags_parse() {
        match parse(&["vending-sim", "run", "--days", "10", "--seed", "7", "--stop-after", "3"]) {
            Commands::Run {
                options,
                seed,
                days,
                config,
            } => {
                assert_eq!(seed, Some(7));
                assert_eq!(days, Some(10));
                assert!(config.is_none());
                assert_eq!(options.stop_after, Some(3));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_strategy_flag_picks_builtin() {
        let agent = build_agent(&run_options(&["--strategy", "idle"])).unwrap();
        assert_eq!(agent.name(), "idle");

        let agent = build_agent(&run_options(&[])).unwrap();
        assert_eq!(agent.name(), "restock");
    }

    #[test]
    fn test_policy_file_overrides_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(&path, r#"{"type": "Scripted", "actions": {}}"#).unwrap();

        let options = run_options(&["--strategy", "idle", "--policy", path.to_str().unwrap()]);
        assert_eq!(build_agent(&options).unwrap().name(), "scripted");
    }

    #[test]
    fn test_bad_policy_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(&path, r#"{"type": "Gambler"}"#).unwrap();

        let options = run_options(&["--policy", path.to_str().unwrap()]);
        assert!(build_agent(&options).is_err());
    }

    #[test]
    fn test_stop_save_resume_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let state_arg = state.to_str().unwrap();

        let sim = start_run(None, Some(99), Some(10)).unwrap();
        let paused = drive(
            sim,
            &run_options(&["--stop-after", "3", "--save", state_arg, "--json"]),
        )
        .unwrap();
        assert_eq!(paused.current_day(), 3);
        assert!(!paused.is_over());

        let resumed = resume_run(&state, None).unwrap();
        assert_eq!(resumed.current_day(), 3);
        assert_eq!(resumed.run_id(), paused.run_id());
        assert_eq!(resumed.config().max_days, 10);
        assert_eq!(resumed.config().rng_seed, 99);

        let finished = drive(resumed, &run_options(&["--json"])).unwrap();
        assert!(finished.is_over());
        assert_eq!(finished.current_day(), 10);

        // An uninterrupted run with the same settings ends the same way
        let straight = drive(start_run(None, Some(99), Some(10)).unwrap(), &run_options(&["--json"]))
            .unwrap();
        assert_eq!(finished.history(), straight.history());
        assert_eq!(finished.outcome(), straight.outcome());
    }

    #[test]
    fn test_resume_rejects_mismatched_config() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"max_days": 4}"#).unwrap();

        let sim = start_run(None, None, Some(10)).unwrap();
        drive(
            sim,
            &run_options(&["--stop-after", "1", "--save", state.to_str().unwrap(), "--json"]),
        )
        .unwrap();

        assert!(resume_run(&state, Some(&config)).is_err());
    }

    #[test]
    fn test_finished_run_cannot_be_driven() {
        let sim = start_run(None, None, Some(1)).unwrap();
        let done = drive(sim, &run_options(&["--strategy", "idle", "--json"])).unwrap();
        assert_eq!(done.outcome(), Some(Outcome::Loss));
        assert!(drive(done, &run_options(&["--json"])).is_err());
    }
}
