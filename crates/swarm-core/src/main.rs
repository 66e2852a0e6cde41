//! Drone Swarm Simulation
//!
//! Runs a headless episode: drones random-walk on the grid while the
//! observation and communication graphs are recomputed every tick and
//! written to a JSONL log.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use swarm_core::{
    default_config_toml, AsciiRenderer, Episode, GraphKind, GraphLogger, RandomWalk, SimConfig,
    DEFAULT_CONFIG_PATH,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "swarm_sim")]
#[command(about = "Drone swarm simulation with observation and communication graphs")]
struct Args {
    /// TOML configuration file (defaults to swarm.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for spawning and movement
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate (overrides world.iterations)
    #[arg(long)]
    ticks: Option<u64>,

    /// Where to write per-tick graph snapshots
    #[arg(long, default_value = "output/graphs.jsonl")]
    output: PathBuf,

    /// Draw the chosen graph to stdout after every tick (same as `[render] enabled = true`)
    #[arg(long, value_enum)]
    render: Option<GraphKind>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            SimConfig::from_file(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.world.iterations = ticks;
    }
    if let Some(mode) = args.render {
        config.render.enabled = true;
        config.render.mode = mode;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    tracing::info!(
        "Seed: {} | Ticks: {} | Agents: {} truthful, {} adversarial",
        config.world.seed,
        config.world.iterations,
        config.world.num_good_agents,
        config.world.num_adversarial_agents
    );

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut logger = GraphLogger::new(&args.output)?;

    let mut walk = RandomWalk::new(config.world.seed);
    let mut episode = Episode::new(config)?;
    if episode.config().render.enabled {
        let show_edges = episode.config().render.show_edges;
        episode.set_renderer(Box::new(AsciiRenderer::new(std::io::stdout(), show_edges)));
    }

    episode.reset();
    logger.log(&episode.snapshot())?;

    loop {
        let actions = walk.actions_for(episode.roster());
        let outcome = episode.step(&actions)?;
        let snapshot = episode.snapshot();
        logger.log(&snapshot)?;

        if outcome.tick % 10 == 0 {
            let (obs_edges, comm_edges) = snapshot.edge_counts();
            tracing::info!(
                "[Tick {:>4}] observation edges: {}, communication edges: {}",
                outcome.tick,
                obs_edges,
                comm_edges
            );
        }

        if outcome.truncated {
            break;
        }
    }

    logger.flush()?;
    let [dx, dy] = episode.arrangement_vector();
    tracing::info!(
        "Simulation complete. Ran {} ticks, wrote {} snapshots to {:?}. Arrangement vector: ({:.2}, {:.2})",
        episode.num_moves(),
        logger.snapshot_count(),
        args.output,
        dx,
        dy
    );
    Ok(())
}
