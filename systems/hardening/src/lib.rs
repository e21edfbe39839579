#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hill-climbing search for mazes that are expensive to solve.
//!
//! The fitness of a maze is the workload a fixed solver spends on it: the
//! largest depth-first frontier, or the number of cells A* expands with the
//! Manhattan heuristic. Each iteration flips every cell in turn, re-solves,
//! and reverts; the single best strictly improving flip (the first one on
//! ties) is then adopted. Flips that disconnect the start from the goal are
//! never adopted.

mod driver;

use std::time::{Duration, Instant};

use maze_fire_core::{CellCoord, HardnessMetric, MazeError};
use maze_fire_system_search::{SearchQuery, Solver};
use maze_fire_world::Maze;
use thiserror::Error;
use tracing::{debug, info};

pub use driver::{find_hardest_maze, HardestMaze, HardestMazeConfig};

/// External cutoffs for a hill climb.
///
/// Both limits are checked between iterations; a scan that has started always
/// completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HardeningLimits {
    /// Maximum number of mutations to adopt. `None` climbs until a local optimum.
    pub max_iterations: Option<usize>,
    /// Wall-clock budget for the climb. `None` never times out.
    pub time_budget: Option<Duration>,
}

impl HardeningLimits {
    /// Limits that only stop at a local optimum.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_iterations: None,
            time_budget: None,
        }
    }

    /// Caps the number of adopted mutations.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Caps the wall-clock time of the climb.
    #[must_use]
    pub const fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = Some(time_budget);
        self
    }
}

/// Reason a hill climb stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// No single flip made the maze harder.
    LocalOptimum,
    /// The configured iteration cap was reached.
    IterationLimit,
    /// The configured time budget ran out.
    TimeBudget,
}

/// Result of a hill climb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardenedMaze {
    maze: Maze,
    metric: HardnessMetric,
    baseline: usize,
    fitness: usize,
    iterations: usize,
    stop: StopReason,
}

impl HardenedMaze {
    /// The hardest maze the climb reached.
    #[must_use]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Consumes the report, yielding the hardened maze.
    #[must_use]
    pub fn into_maze(self) -> Maze {
        self.maze
    }

    /// Metric the climb maximised.
    #[must_use]
    pub const fn metric(&self) -> HardnessMetric {
        self.metric
    }

    /// Fitness of the starting maze.
    #[must_use]
    pub const fn baseline(&self) -> usize {
        self.baseline
    }

    /// Fitness of the hardened maze.
    #[must_use]
    pub const fn fitness(&self) -> usize {
        self.fitness
    }

    /// Number of mutations adopted.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Why the climb stopped.
    #[must_use]
    pub const fn stop_reason(&self) -> StopReason {
        self.stop
    }
}

/// Failures reported by the hardening engine.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HardeningError {
    /// The starting maze has no route from start to goal.
    #[error("the starting maze has no route from start to goal")]
    Unsolvable,
    /// The starting maze is already a local optimum.
    #[error("no single-cell flip makes the maze harder than fitness {fitness}")]
    NoImprovementFound {
        /// Fitness of the unchanged starting maze.
        fitness: usize,
    },
    /// Every generated starting maze was unsolvable.
    #[error("none of the {attempts} generated starting mazes was solvable")]
    NoSolvableStart {
        /// Number of starting mazes that were generated.
        attempts: usize,
    },
    /// The restart configuration was rejected.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Hill climber bound to one hardness metric.
///
/// The climber owns a solver so its scratch state is reused across the many
/// re-solves of a scan.
#[derive(Clone, Debug)]
pub struct HillClimber {
    metric: HardnessMetric,
    query: SearchQuery,
    solver: Solver,
}

impl HillClimber {
    /// Creates a climber maximising `metric`.
    #[must_use]
    pub fn new(metric: HardnessMetric) -> Self {
        Self {
            metric,
            query: SearchQuery::new(metric.algorithm()).with_heuristic(metric.heuristic()),
            solver: Solver::new(),
        }
    }

    /// Fitness of `maze`, or `None` when it is unsolvable.
    pub fn fitness(&mut self, maze: &Maze) -> Option<usize> {
        let outcome = self.solver.solve(maze, &self.query);
        outcome
            .is_found()
            .then(|| self.metric.score(&outcome.stats()))
    }

    /// Climbs from `maze` until a local optimum or one of `limits` is hit.
    pub fn climb(
        &mut self,
        mut maze: Maze,
        limits: HardeningLimits,
    ) -> Result<HardenedMaze, HardeningError> {
        let started = Instant::now();
        let baseline = self.fitness(&maze).ok_or(HardeningError::Unsolvable)?;
        let mut fitness = baseline;
        let mut iterations = 0;

        let stop = loop {
            if limits
                .max_iterations
                .is_some_and(|max_iterations| iterations >= max_iterations)
            {
                break StopReason::IterationLimit;
            }
            if limits
                .time_budget
                .is_some_and(|budget| started.elapsed() >= budget)
            {
                break StopReason::TimeBudget;
            }

            let Some((cell, improved)) = self.best_flip(&mut maze, fitness) else {
                break StopReason::LocalOptimum;
            };
            let _ = maze.toggle_blocked(cell);
            iterations += 1;
            debug!(
                iteration = iterations,
                row = cell.row(),
                column = cell.column(),
                from = fitness,
                to = improved,
                "adopted mutation"
            );
            fitness = improved;
        };

        if iterations == 0 && stop == StopReason::LocalOptimum {
            return Err(HardeningError::NoImprovementFound { fitness });
        }

        info!(
            metric = ?self.metric,
            baseline,
            fitness,
            iterations,
            stop = ?stop,
            "hill climb finished"
        );
        Ok(HardenedMaze {
            maze,
            metric: self.metric,
            baseline,
            fitness,
            iterations,
            stop,
        })
    }

    /// Scans every single-cell flip of `maze` and returns the first one with
    /// the highest fitness above `current`. The maze is left unchanged.
    fn best_flip(&mut self, maze: &mut Maze, current: usize) -> Option<(CellCoord, usize)> {
        let mut best: Option<(CellCoord, usize)> = None;
        let mut threshold = current;

        for index in 0..maze.cell_count() {
            let Some(cell) = maze.coord(index) else {
                continue;
            };
            if !maze.toggle_blocked(cell) {
                continue;
            }
            let candidate = self.fitness(maze);
            let _ = maze.toggle_blocked(cell);

            if let Some(candidate) = candidate {
                if candidate > threshold {
                    threshold = candidate;
                    best = Some((cell, candidate));
                }
            }
        }

        best
    }
}

/// Hardens `maze` by hill climbing on `metric` within `limits`.
///
/// Returns [`HardeningError::Unsolvable`] when the starting maze has no path
/// and [`HardeningError::NoImprovementFound`] when it is already a local
/// optimum.
pub fn harden_maze(
    maze: Maze,
    metric: HardnessMetric,
    limits: HardeningLimits,
) -> Result<HardenedMaze, HardeningError> {
    HillClimber::new(metric).climb(maze, limits)
}
