#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Real-time escape from a burning maze.
//!
//! An agent starts in the upper-left corner with a plan to the lower-right
//! corner. Turns strictly alternate: the agent advances one cell along its
//! plan, then the fire spreads one step. The agent fails as soon as it stands
//! on a burning cell. Strategies differ only in how they plan after the fire
//! moves: `Ignore` keeps its initial route, `Avoid` replans around burning
//! cells, and `Predict` replans with a heuristic that also shies away from
//! cells likely to ignite next.

mod scenario;

use maze_fire_core::{CellCoord, Heuristic, MazeError, Path, StrategyKind};
use maze_fire_system_fire::FireSpread;
use maze_fire_system_search::{SearchQuery, Solver};
use maze_fire_world::Maze;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

pub use scenario::{viable_scenario, Scenario, ScenarioConfig, ScenarioError};

/// How an escape attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The agent reached the goal.
    Escaped {
        /// Moves the agent made.
        moves: usize,
    },
    /// The agent stood on a burning cell.
    Burned {
        /// Moves the agent made before burning.
        moves: usize,
        /// Cell where the agent burned.
        cell: CellCoord,
    },
    /// Replanning found no fire-free route to the goal.
    Trapped {
        /// Moves the agent made before becoming trapped.
        moves: usize,
        /// Cell where the agent was trapped.
        cell: CellCoord,
    },
}

impl Outcome {
    /// Reports whether the agent reached the goal.
    #[must_use]
    pub const fn escaped(&self) -> bool {
        matches!(self, Self::Escaped { .. })
    }

    /// Moves the agent made before the attempt ended.
    #[must_use]
    pub const fn moves(&self) -> usize {
        match self {
            Self::Escaped { moves } | Self::Burned { moves, .. } | Self::Trapped { moves, .. } => {
                *moves
            }
        }
    }
}

impl From<Outcome> for bool {
    fn from(outcome: Outcome) -> Self {
        outcome.escaped()
    }
}

/// Precondition failures of an escape attempt.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum NavigationError {
    /// No route from the start to the goal existed when the attempt began.
    #[error("no initial plan from start to goal was provided")]
    NoInitialPlan,
    /// The initial plan does not run from the maze's start to its goal.
    #[error("initial plan runs from ({}, {}) to ({}, {}) instead of corner to corner", start.row(), start.column(), goal.row(), goal.column())]
    PlanEndpoints {
        /// First cell of the rejected plan.
        start: CellCoord,
        /// Last cell of the rejected plan.
        goal: CellCoord,
    },
    /// The fire configuration was rejected.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Heuristic a strategy plans with, or `None` when it never replans.
#[must_use]
pub fn replanning_heuristic(kind: StrategyKind, flammability: f64) -> Option<Heuristic> {
    match kind {
        StrategyKind::Ignore => None,
        StrategyKind::Avoid => Some(Heuristic::Euclidean),
        StrategyKind::Predict => Some(Heuristic::FireRisk { flammability }),
    }
}

/// Plan a strategy starts from: A* over the present fire state, with the
/// Euclidean heuristic for `Ignore` and `Avoid` and the fire-risk heuristic
/// for `Predict`.
#[must_use]
pub fn initial_plan(kind: StrategyKind, maze: &Maze, flammability: f64) -> Option<Path> {
    let heuristic = replanning_heuristic(kind, flammability).unwrap_or(Heuristic::Euclidean);
    Solver::new()
        .solve(maze, &SearchQuery::a_star(heuristic))
        .into_path()
}

/// Plays `kind` on `maze` from `initial_plan` while fire spreads at
/// `flammability`, mutating the maze's fire state.
///
/// Returns [`NavigationError::NoInitialPlan`] when no plan is supplied; being
/// cut off during play is reported as [`Outcome::Trapped`] instead.
pub fn run_strategy<R>(
    kind: StrategyKind,
    maze: &mut Maze,
    initial_plan: Option<Path>,
    flammability: f64,
    rng: &mut R,
) -> Result<Outcome, NavigationError>
where
    R: Rng + ?Sized,
{
    let plan = initial_plan.ok_or(NavigationError::NoInitialPlan)?;
    if plan.start() != maze.start() || plan.goal() != maze.goal() {
        return Err(NavigationError::PlanEndpoints {
            start: plan.start(),
            goal: plan.goal(),
        });
    }

    let mut escape = Escape {
        kind,
        replan: replanning_heuristic(kind, flammability),
        fire: FireSpread::new(flammability)?,
        solver: Solver::new(),
        route: plan.into_vec(),
        cursor: 0,
        moves: 0,
    };
    let outcome = escape.run(maze, rng);
    info!(strategy = ?kind, ?outcome, "escape attempt finished");
    Ok(outcome)
}

/// State of one escape attempt.
#[derive(Debug)]
struct Escape {
    kind: StrategyKind,
    replan: Option<Heuristic>,
    fire: FireSpread,
    solver: Solver,
    route: Vec<CellCoord>,
    cursor: usize,
    moves: usize,
}

impl Escape {
    fn position(&self) -> CellCoord {
        self.route[self.cursor]
    }

    fn run<R>(&mut self, maze: &mut Maze, rng: &mut R) -> Outcome
    where
        R: Rng + ?Sized,
    {
        let goal = maze.goal();

        loop {
            let agent = self.position();
            if maze.is_on_fire(agent) {
                return self.burned(agent);
            }
            if agent == goal {
                return Outcome::Escaped { moves: self.moves };
            }

            if self.cursor + 1 >= self.route.len() {
                return self.trapped(agent);
            }
            self.cursor += 1;
            self.moves += 1;
            let agent = self.position();
            if maze.is_on_fire(agent) {
                return self.burned(agent);
            }
            if agent == goal {
                return Outcome::Escaped { moves: self.moves };
            }

            let ignited = self.fire.step(maze, rng);
            debug!(
                strategy = ?self.kind,
                moves = self.moves,
                row = agent.row(),
                column = agent.column(),
                ignited,
                "turn played"
            );
            if maze.is_on_fire(agent) {
                return self.burned(agent);
            }

            if let Some(heuristic) = self.replan {
                let query = SearchQuery::a_star(heuristic).from(agent);
                let Some(path) = self.solver.solve(maze, &query).into_path() else {
                    return self.trapped(agent);
                };
                self.route = path.into_vec();
                self.cursor = 0;
            }
        }
    }

    fn burned(&self, cell: CellCoord) -> Outcome {
        Outcome::Burned {
            moves: self.moves,
            cell,
        }
    }

    fn trapped(&self, cell: CellCoord) -> Outcome {
        Outcome::Trapped {
            moves: self.moves,
            cell,
        }
    }
}
