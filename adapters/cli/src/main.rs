#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the maze-on-fire engine.

use std::{fmt::Write as _, fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use maze_fire_core::{Algorithm, CellCoord, HardnessMetric, Heuristic, Path, StrategyKind};
use maze_fire_system_generation::generate_maze;
use maze_fire_system_hardening::{
    find_hardest_maze, harden_maze, HardenedMaze, HardeningError, HardeningLimits,
    HardestMazeConfig,
};
use maze_fire_system_navigation::{initial_plan, run_strategy, viable_scenario, ScenarioConfig};
use maze_fire_system_search::{SearchQuery, Solver};
use maze_fire_world::Maze;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PATH_TILE: char = 'o';

#[derive(Debug, Parser)]
#[command(
    name = "maze-fire",
    about = "Generate, solve, harden and escape burning mazes"
)]
struct Cli {
    /// Seed for every random draw. Equal seeds replay equal runs.
    #[arg(long, global = true, default_value_t = 0)]
    seed: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve one maze with every algorithm and compare their workload.
    Solve(SolveArgs),
    /// Hill-climb a maze into one that is expensive to solve.
    Harden(HardenArgs),
    /// Pit the escape strategies against spreading fire.
    Escape(EscapeArgs),
}

#[derive(Debug, Args)]
struct MazeArgs {
    /// Rows and columns of a generated maze.
    #[arg(long, default_value_t = 20)]
    dimension: u32,
    /// Probability that a generated cell is blocked.
    #[arg(long, default_value_t = 0.2)]
    density: f64,
    /// Load an ASCII layout (`.` open, `#` blocked, `*` burning) instead of generating.
    #[arg(long)]
    layout: Option<PathBuf>,
}

impl MazeArgs {
    fn load(&self, rng: &mut ChaCha8Rng) -> Result<Maze> {
        match &self.layout {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Maze::parse(&text).with_context(|| format!("invalid layout in {}", path.display()))
            }
            None => generate_maze(self.dimension, self.density, false, rng)
                .context("invalid maze parameters"),
        }
    }
}

#[derive(Debug, Args)]
struct SolveArgs {
    #[command(flatten)]
    maze: MazeArgs,
    /// Print the maze with the breadth-first route drawn on it.
    #[arg(long)]
    show: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MetricArg {
    /// Largest depth-first frontier.
    MaxFrontier,
    /// Cells expanded by A* with the Manhattan heuristic.
    ExpandedCells,
}

impl From<MetricArg> for HardnessMetric {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::MaxFrontier => HardnessMetric::MaxFrontier,
            MetricArg::ExpandedCells => HardnessMetric::ExpandedCells,
        }
    }
}

#[derive(Debug, Args)]
struct HardenArgs {
    #[command(flatten)]
    maze: MazeArgs,
    /// Workload the climb maximises.
    #[arg(long, value_enum, default_value_t = MetricArg::MaxFrontier)]
    metric: MetricArg,
    /// Stop after adopting this many mutations.
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Stop a climb after this many seconds.
    #[arg(long)]
    seconds: Option<u64>,
    /// Restart from freshly generated mazes across `--densities` and keep the hardest.
    #[arg(long)]
    sweep: bool,
    /// Densities visited by `--sweep`.
    #[arg(long, value_delimiter = ',', default_values_t = [0.1, 0.2, 0.3, 0.4])]
    densities: Vec<f64>,
    /// Starting mazes generated per density by `--sweep`.
    #[arg(long, default_value_t = 5)]
    restarts: usize,
    /// Print the hardened maze.
    #[arg(long)]
    show: bool,
}

impl HardenArgs {
    fn limits(&self) -> HardeningLimits {
        HardeningLimits {
            max_iterations: self.max_iterations,
            time_budget: self.seconds.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Args)]
struct EscapeArgs {
    /// Rows and columns of each generated maze.
    #[arg(long, default_value_t = 30)]
    dimension: u32,
    /// Probability that a generated cell is blocked.
    #[arg(long, default_value_t = 0.28)]
    density: f64,
    /// Per-neighbour contagion probability of the fire.
    #[arg(long, default_value_t = 0.3)]
    flammability: f64,
    /// Fire mazes every strategy attempts.
    #[arg(long, default_value_t = 10)]
    trials: usize,
    /// Mazes generated per trial before giving up on finding a viable one.
    #[arg(long, default_value_t = 1_000)]
    max_attempts: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(seed = cli.seed, "maze-fire starting");
    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);

    match cli.command {
        Command::Solve(args) => solve(&args, &mut rng),
        Command::Harden(args) => harden(&args, cli.seed, &mut rng),
        Command::Escape(args) => escape(&args, &mut rng),
    }
}

fn solve(args: &SolveArgs, rng: &mut ChaCha8Rng) -> Result<()> {
    let maze = args.maze.load(rng)?;
    let queries = [
        ("dfs", SearchQuery::new(Algorithm::DepthFirst)),
        ("bfs", SearchQuery::new(Algorithm::BreadthFirst)),
        ("bidirectional", SearchQuery::new(Algorithm::Bidirectional)),
        ("astar-euclidean", SearchQuery::a_star(Heuristic::Euclidean)),
        ("astar-manhattan", SearchQuery::a_star(Heuristic::Manhattan)),
    ];

    let mut solver = Solver::new();
    let mut route = None;
    println!(
        "{:<16} {:>8} {:>10} {:>13}",
        "algorithm", "length", "expanded", "max-frontier"
    );
    for (label, query) in &queries {
        let outcome = solver.solve(&maze, query);
        let stats = outcome.stats();
        let length = outcome
            .path()
            .map_or_else(|| "-".to_owned(), |path| path.length().to_string());
        println!(
            "{label:<16} {length:>8} {:>10} {:>13}",
            stats.expanded(),
            stats.max_frontier()
        );
        if query.algorithm() == Algorithm::BreadthFirst {
            route = outcome.into_path();
        }
    }

    if args.show {
        print!("{}", render(&maze, route.as_ref()));
    }
    Ok(())
}

fn harden(args: &HardenArgs, seed: u64, rng: &mut ChaCha8Rng) -> Result<()> {
    let metric = HardnessMetric::from(args.metric);

    let report = if args.sweep {
        let config = HardestMazeConfig {
            dimension: args.maze.dimension,
            densities: args.densities.clone(),
            restarts_per_density: args.restarts,
            seed,
            limits: args.limits(),
        };
        let hardest = find_hardest_maze(&config, metric)?;
        println!(
            "hardest start: density {} (restart {})",
            hardest.density, hardest.restart
        );
        hardest.hardened
    } else {
        let maze = args.maze.load(rng)?;
        match harden_maze(maze.clone(), metric, args.limits()) {
            Ok(report) => report,
            Err(HardeningError::NoImprovementFound { fitness }) => {
                println!("already at a local optimum with fitness {fitness}");
                if args.show {
                    print!("{}", render(&maze, None));
                }
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        }
    };

    print_hardened(&report);
    if args.show {
        print!("{}", render(report.maze(), None));
    }
    Ok(())
}

fn print_hardened(report: &HardenedMaze) {
    println!(
        "{:?}: {} -> {} after {} mutations ({:?})",
        report.metric(),
        report.baseline(),
        report.fitness(),
        report.iterations(),
        report.stop_reason()
    );
}

fn escape(args: &EscapeArgs, rng: &mut ChaCha8Rng) -> Result<()> {
    let config = ScenarioConfig {
        dimension: args.dimension,
        density: args.density,
        flammability: args.flammability,
        max_attempts: args.max_attempts,
    };

    let mut escaped = [0_usize; StrategyKind::ALL.len()];
    for trial in 0..args.trials {
        let scenario = viable_scenario(&config, rng)
            .with_context(|| format!("trial {trial} found no viable maze"))?;
        for (kind, tally) in StrategyKind::ALL.into_iter().zip(escaped.iter_mut()) {
            let mut maze = scenario.maze.clone();
            let plan = initial_plan(kind, &maze, config.flammability);
            let outcome = run_strategy(kind, &mut maze, plan, config.flammability, rng)?;
            if outcome.escaped() {
                *tally += 1;
            }
        }
    }

    for (kind, tally) in StrategyKind::ALL.into_iter().zip(escaped) {
        println!("{:<8} {tally}/{}", format!("{kind:?}").to_lowercase(), args.trials);
    }
    Ok(())
}

/// Renders the maze as ASCII with the route, if any, drawn over open cells.
fn render(maze: &Maze, route: Option<&Path>) -> String {
    let mut text = String::with_capacity(maze.cell_count() + maze.dimension() as usize);
    for (line, row) in maze.to_string().lines().zip(0..) {
        for (tile, column) in line.chars().zip(0..) {
            let on_route = route.is_some_and(|path| path.contains(CellCoord::new(row, column)));
            text.push(if on_route { PATH_TILE } else { tile });
        }
        let _ = writeln!(text);
    }
    text
}
