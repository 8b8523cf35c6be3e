//! Forager CLI - GOAP gatherer simulation.
//!
//! - `forager run` - run a scenario and print what each unit delivered
//! - `forager plan` - print the first plan each unit settles on
//! - `forager status` - print agent snapshots after N ticks

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use forager::{ResourceKind, Scenario, Simulation};
use goap_tools::tags;

#[derive(Parser)]
#[command(name = "forager")]
#[command(about = "GOAP gatherer simulation", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario to completion
    Run {
        /// Scenario file (YAML)
        #[arg(short, long)]
        scenario: PathBuf,

        /// Override the scenario's tick count
        #[arg(long)]
        ticks: Option<u64>,

        /// Print the decision trace as JSON after the run
        #[arg(long)]
        trace_json: bool,
    },

    /// Show the first plan each unit finds
    Plan {
        /// Scenario file (YAML)
        #[arg(short, long)]
        scenario: PathBuf,
    },

    /// Show agent status after a number of ticks
    Status {
        /// Scenario file (YAML)
        #[arg(short, long)]
        scenario: PathBuf,

        /// Ticks to simulate before reporting
        #[arg(long, default_value = "1")]
        ticks: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--trace-json` output stays parseable.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    if cli.json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Run {
            scenario,
            ticks,
            trace_json,
        } => run(&scenario, ticks, trace_json),
        Commands::Plan { scenario } => plan(&scenario),
        Commands::Status { scenario, ticks } => status(&scenario, ticks),
    }
}

fn run(path: &Path, ticks: Option<u64>, trace_json: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let ticks = ticks.unwrap_or(scenario.ticks);
    tracing::info!(scenario = %path.display(), ticks, "Starting simulation");

    let mut sim = Simulation::from_scenario(&scenario)?;
    sim.run(ticks)?;

    if trace_json {
        let log = sim.trace().snapshot();
        println!("{}", serde_json::to_string_pretty(&log)?);
        return Ok(());
    }

    println!("Simulated {ticks} ticks");
    println!();
    println!("Deposited:");
    for kind in [ResourceKind::Wood, ResourceKind::Stone, ResourceKind::Ore] {
        let amount = sim.world().deposited(kind);
        if amount > 0 {
            println!("  {kind}: {amount}");
        }
    }
    println!();
    println!("Units:");
    for agent in sim.agents() {
        let unit = sim.world().unit(agent.id());
        let fuel = unit.map_or(0.0, |u| u.fuel);
        let position = unit.map_or(0.0, |u| u.position);
        let goal = agent.active_goal().map_or("none", |g| g.0);
        println!(
            "  {} - position: {position:.1}, fuel: {fuel:.1}, goal: {goal}, executor: {}",
            agent.id(),
            agent.executor().state()
        );
    }
    println!();
    let log = sim.trace().snapshot();
    println!(
        "Decisions: {} events, {} plans, {} planning failures, {} action failures",
        log.len(),
        log.count(tags::PLAN_FOUND),
        log.count(tags::PLAN_FAILED),
        log.count(tags::ACTION_FAILED),
    );
    Ok(())
}

fn plan(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let mut sim = Simulation::from_scenario(&scenario)?;
    sim.run_until_planned(scenario.ticks)?;

    for agent in sim.agents() {
        let goal = agent.active_goal().map_or("none", |g| g.0);
        match agent.executor().plan() {
            Some(plan) => {
                let steps: Vec<&str> = plan.action_ids().map(|a| a.0).collect();
                println!(
                    "unit {} [{goal}]: {} (cost {})",
                    agent.id(),
                    steps.join(" -> "),
                    plan.total_cost()
                );
            }
            None => match agent.last_error() {
                Some(err) => println!("unit {} [{goal}]: no plan ({err})", agent.id()),
                None => println!("unit {} [{goal}]: no plan", agent.id()),
            },
        }
    }
    Ok(())
}

fn status(path: &Path, ticks: u64) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let mut sim = Simulation::from_scenario(&scenario)?;
    sim.run(ticks)?;

    for (i, status) in sim.statuses().iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{status}");
    }
    Ok(())
}
