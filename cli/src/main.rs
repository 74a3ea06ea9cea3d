use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};

use token_flow_core_rs::orchestrator::{SimulationSnapshot, Simulator, SimulatorConfig, TickOutcome};
use token_flow_core_rs::presets::{airport_definition, airport_statistics_config, AirportScenario};
use token_flow_core_rs::{NetworkDefinition, PolicyConfig, Statistics, StepCounting};

#[derive(Parser, Debug)]
#[command(name = "token-flow")]
#[command(version)]
#[command(about = "Simulates token flow through place/transition networks.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulation and print its statistics
    Run(RunArgs),
    /// Check that a network definition is valid
    Validate {
        #[arg(value_name = "NETWORK_JSON")]
        network: PathBuf,
    },
    /// Restore a snapshot and print the state it describes
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct NetworkArgs {
    #[arg(long, help = "Simulator configuration (JSON). Defaults to the airport preset.")]
    config: Option<PathBuf>,
    #[arg(
        long,
        conflicts_with = "config",
        help = "Network definition (JSON) run with default settings"
    )]
    network: Option<PathBuf>,
    #[arg(
        long,
        default_value = "default",
        help = "Airport scenario: default, bottleneck, high-traffic, empty"
    )]
    scenario: AirportScenario,
    #[arg(long, help = "Cap every airport place at this many tokens")]
    capacity: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    Uniform,
    RoundRobin,
    Priority,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    source: NetworkArgs,
    #[arg(long, help = "RNG seed (overrides the configuration)")]
    seed: Option<u64>,
    #[arg(long, value_enum, help = "Selection policy (overrides the configuration)")]
    policy: Option<PolicyKind>,
    #[arg(long, value_delimiter = ',', help = "Transition order for the priority policy")]
    priority: Vec<String>,
    #[arg(long, help = "Count only successful firings as steps")]
    count_firings: bool,
    #[arg(short, long, default_value_t = 100)]
    ticks: usize,
    #[arg(long, default_value_t = 10, help = "Number of recent events to print")]
    history: usize,
    #[arg(long, help = "Print statistics as JSON")]
    json: bool,
    #[arg(long, help = "Write a snapshot of the final state to this file")]
    snapshot_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(value_name = "SNAPSHOT_JSON")]
    snapshot: PathBuf,
    #[command(flatten)]
    source: NetworkArgs,
    #[arg(long, help = "Print the marking after only this many events")]
    prefix: Option<usize>,
}

fn main() -> Result<()> {
    let env = env_logger::Env::new()
        .filter("TOKEN_FLOW_LOG")
        .write_style("TOKEN_FLOW_LOG_STYLE");
    env_logger::init_from_env(env);

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Validate { network } => validate(&network),
        Command::Replay(args) => replay(args),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(args: &NetworkArgs) -> Result<SimulatorConfig> {
    if let Some(path) = &args.network {
        let definition = NetworkDefinition::from_json(&read(path)?)
            .with_context(|| format!("invalid network in {}", path.display()))?;
        return Ok(SimulatorConfig::new(definition));
    }
    match &args.config {
        Some(path) => {
            let config = SimulatorConfig::from_json(&read(path)?)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            Ok(config)
        }
        None => Ok(
            SimulatorConfig::new(airport_definition(args.scenario, args.capacity))
                .with_statistics(airport_statistics_config()),
        ),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = load_config(&args.source)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    match args.policy {
        Some(PolicyKind::Uniform) => config = config.with_policy(PolicyConfig::UniformRandom),
        Some(PolicyKind::RoundRobin) => config = config.with_policy(PolicyConfig::RoundRobin),
        Some(PolicyKind::Priority) => {
            if args.priority.is_empty() {
                bail!("--policy priority needs --priority T1,T2,...");
            }
            config = config.with_policy(PolicyConfig::PriorityOrdered {
                order: args.priority.clone(),
            });
        }
        None => {}
    }
    if args.count_firings {
        config = config.with_step_counting(StepCounting::Firings);
    }

    let mut simulator = Simulator::new(config).context("failed to create simulator")?;
    info!(
        "running {} for up to {} ticks with {} policy",
        simulator.network().name(),
        args.ticks,
        simulator.policy_name()
    );

    simulator.start();
    let outcomes = simulator.run_for(args.ticks);
    let rejected = outcomes
        .iter()
        .filter(|o| matches!(o, TickOutcome::Rejected { .. }))
        .count();
    debug!("{} ticks, {} rejected", outcomes.len(), rejected);
    simulator.pause();

    let stats = simulator.statistics();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "Ran {} ticks, final state {}",
            outcomes.len(),
            simulator.run_state()
        );
        print_statistics(&stats);
        println!();
        println!("Recent events:");
        for record in simulator.recent_events(args.history) {
            println!("  #{:<5} {}", record.step, record.transition_id);
        }
    }

    if let Some(path) = &args.snapshot_out {
        let json = simulator.snapshot()?.to_json()?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("snapshot written to {}", path.display());
    }

    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let definition = NetworkDefinition::from_json(&read(path)?)?;
    let network = definition
        .build()
        .with_context(|| format!("invalid network in {}", path.display()))?;
    println!(
        "{}: {} places, {} transitions",
        if network.name().is_empty() { "network" } else { network.name() },
        network.num_places(),
        network.num_transitions()
    );
    for transition in network.transitions() {
        let inputs: Vec<String> = transition
            .inputs()
            .iter()
            .filter_map(|arc| {
                network
                    .place_at(arc.place())
                    .map(|p| format!("{}x{}", arc.weight(), p.id()))
            })
            .collect();
        let outputs: Vec<String> = transition
            .outputs()
            .iter()
            .filter_map(|arc| {
                network
                    .place_at(arc.place())
                    .map(|p| format!("{}x{}", arc.weight(), p.id()))
            })
            .collect();
        println!(
            "  {}: {} -> {}",
            transition.id(),
            inputs.join(" + "),
            outputs.join(" + ")
        );
    }
    Ok(())
}

fn replay(args: ReplayArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let snapshot = SimulationSnapshot::from_json(&read(&args.snapshot)?)?;
    let simulator = Simulator::restore(config, snapshot).context("failed to restore snapshot")?;

    println!(
        "Run {}: {} events, {} steps, {}",
        simulator.run_id(),
        simulator.event_log().len(),
        simulator.total_steps(),
        simulator.run_state()
    );

    match args.prefix {
        Some(k) => {
            let marking = simulator.replay_to(k)?;
            println!("Marking after {} events:", k);
            for (place, tokens) in marking.iter() {
                println!("  {:<6} {}", place, tokens);
            }
        }
        None => print_statistics(&simulator.statistics()),
    }
    Ok(())
}

fn print_statistics(stats: &Statistics) {
    println!("Events:      {}", stats.total_events);
    println!("Steps:       {}", stats.total_steps);
    println!("Efficiency:  {:.1}%", stats.efficiency);
    println!("Utilization: {:.1}%", stats.utilization * 100.0);
    println!("Bottleneck:  {}", if stats.bottleneck { "yes" } else { "no" });
    println!("Firings:");
    for (id, count) in &stats.firing_counts {
        println!("  {:<6} {}", id, count);
    }
    println!("Tokens ({} total):", stats.total_tokens);
    for (place, tokens) in &stats.place_tokens {
        println!("  {:<6} {}", place, tokens);
    }
}
