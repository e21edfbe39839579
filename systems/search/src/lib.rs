#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path-finding over a maze.
//!
//! Four solvers share one entry point: breadth-first, depth-first,
//! bidirectional breadth-first and A*. Each invocation returns its own
//! [`SearchStats`]; nothing is accumulated between calls. Predecessor links
//! and visit marks live in a [`SearchWorkspace`] that is reset at the start of
//! every solve, so one workspace can serve thousands of searches over mazes
//! that change between calls.

mod bidirectional;
mod informed;
mod uninformed;
mod workspace;

use maze_fire_core::{Algorithm, CellCoord, Heuristic, Path, SearchStats};
use maze_fire_world::Maze;
use tracing::trace;

pub use bidirectional::stitch;
pub use workspace::{reset_scratch_state, SearchWorkspace};

/// Parameters of a single search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchQuery {
    algorithm: Algorithm,
    heuristic: Heuristic,
    start: Option<CellCoord>,
    goal: Option<CellCoord>,
    avoid_fire: bool,
}

impl SearchQuery {
    /// Creates a corner-to-corner query for the provided algorithm.
    ///
    /// A* treats burning cells as impassable by default and estimates the
    /// remaining distance with the Manhattan heuristic. The uninformed solvers
    /// walk through fire unless [`SearchQuery::avoiding_fire`] says otherwise.
    #[must_use]
    pub const fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            heuristic: Heuristic::Manhattan,
            start: None,
            goal: None,
            avoid_fire: algorithm.is_informed(),
        }
    }

    /// Creates an A* query using the provided heuristic.
    #[must_use]
    pub const fn a_star(heuristic: Heuristic) -> Self {
        Self::new(Algorithm::AStar).with_heuristic(heuristic)
    }

    /// Replaces the heuristic. Uninformed solvers ignore it.
    #[must_use]
    pub const fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Starts the search from `start` instead of the upper-left corner.
    #[must_use]
    pub const fn from(mut self, start: CellCoord) -> Self {
        self.start = Some(start);
        self
    }

    /// Targets `goal` instead of the lower-right corner.
    #[must_use]
    pub const fn to(mut self, goal: CellCoord) -> Self {
        self.goal = Some(goal);
        self
    }

    /// Controls whether burning cells are treated as impassable.
    #[must_use]
    pub const fn avoiding_fire(mut self, avoid_fire: bool) -> Self {
        self.avoid_fire = avoid_fire;
        self
    }

    /// Algorithm the query runs.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Heuristic consulted by A*.
    #[must_use]
    pub const fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Whether burning cells are impassable.
    #[must_use]
    pub const fn avoids_fire(&self) -> bool {
        self.avoid_fire
    }

    /// Start cell, falling back to the maze's upper-left corner.
    #[must_use]
    pub fn start_in(&self, maze: &Maze) -> CellCoord {
        self.start.unwrap_or_else(|| maze.start())
    }

    /// Goal cell, falling back to the maze's lower-right corner.
    #[must_use]
    pub fn goal_in(&self, maze: &Maze) -> CellCoord {
        self.goal.unwrap_or_else(|| maze.goal())
    }
}

/// Result of a search. Failing to find a path is a normal outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The goal was reached.
    Found {
        /// Route from the start to the goal, inclusive.
        path: Path,
        /// Workload of the search.
        stats: SearchStats,
    },
    /// The frontier was exhausted before the goal was reached.
    NoPath {
        /// Workload of the search.
        stats: SearchStats,
    },
}

impl SearchOutcome {
    /// Path to the goal, if one was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found { path, .. } => Some(path),
            Self::NoPath { .. } => None,
        }
    }

    /// Consumes the outcome, yielding the path if one was found.
    #[must_use]
    pub fn into_path(self) -> Option<Path> {
        match self {
            Self::Found { path, .. } => Some(path),
            Self::NoPath { .. } => None,
        }
    }

    /// Workload of the search regardless of its result.
    #[must_use]
    pub fn stats(&self) -> SearchStats {
        match self {
            Self::Found { stats, .. } | Self::NoPath { stats } => *stats,
        }
    }

    /// Reports whether the goal was reached.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Start and goal of a search resolved to row-major indices.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Endpoints {
    pub(crate) start: usize,
    pub(crate) goal: usize,
    pub(crate) goal_cell: CellCoord,
    pub(crate) avoid_fire: bool,
}

impl Endpoints {
    pub(crate) fn is_passable(&self, maze: &Maze, cell: CellCoord) -> bool {
        maze.is_passable(cell, self.avoid_fire)
    }
}

/// Solver that owns a reusable workspace.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    workspace: SearchWorkspace,
}

impl Solver {
    /// Creates a solver with an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `query` against `maze`, resetting the workspace first.
    pub fn solve(&mut self, maze: &Maze, query: &SearchQuery) -> SearchOutcome {
        solve_with_workspace(&mut self.workspace, maze, query)
    }

    /// Scratch state left behind by the most recent search.
    #[must_use]
    pub fn workspace(&self) -> &SearchWorkspace {
        &self.workspace
    }
}

/// Runs `query` against `maze` with a throwaway workspace.
#[must_use]
pub fn solve(maze: &Maze, query: &SearchQuery) -> SearchOutcome {
    Solver::new().solve(maze, query)
}

/// Runs `query` against `maze` using the caller's workspace.
///
/// The workspace is reset before the search begins.
pub fn solve_with_workspace(
    workspace: &mut SearchWorkspace,
    maze: &Maze,
    query: &SearchQuery,
) -> SearchOutcome {
    reset_scratch_state(workspace, maze);

    let start_cell = query.start_in(maze);
    let goal_cell = query.goal_in(maze);
    let (Some(start), Some(goal)) = (maze.index(start_cell), maze.index(goal_cell)) else {
        return SearchOutcome::NoPath {
            stats: SearchStats::default(),
        };
    };
    if maze.is_blocked(start_cell) || !maze.is_passable(goal_cell, query.avoid_fire) {
        return SearchOutcome::NoPath {
            stats: SearchStats::default(),
        };
    }

    let endpoints = Endpoints {
        start,
        goal,
        goal_cell,
        avoid_fire: query.avoid_fire,
    };

    let outcome = if start == goal {
        workspace.forward.seed(start);
        workspace.forward.mark_visited(start);
        let stats = SearchStats::new(1, 1);
        match Path::new(vec![start_cell]) {
            Some(path) => SearchOutcome::Found { path, stats },
            None => SearchOutcome::NoPath { stats },
        }
    } else {
        match query.algorithm {
            Algorithm::BreadthFirst => {
                uninformed::search(workspace, maze, endpoints, uninformed::Discipline::Fifo)
            }
            Algorithm::DepthFirst => {
                uninformed::search(workspace, maze, endpoints, uninformed::Discipline::Lifo)
            }
            Algorithm::Bidirectional => bidirectional::search(workspace, maze, endpoints),
            Algorithm::AStar => informed::search(workspace, maze, endpoints, query.heuristic),
        }
    };

    let stats = outcome.stats();
    trace!(
        algorithm = ?query.algorithm,
        found = outcome.is_found(),
        expanded = stats.expanded(),
        max_frontier = stats.max_frontier(),
        "search finished"
    );
    outcome
}

/// Builds the outcome for a search that finished with `path`.
pub(crate) fn finish(path: Option<Path>, stats: SearchStats) -> SearchOutcome {
    match path {
        Some(path) => SearchOutcome::Found { path, stats },
        None => SearchOutcome::NoPath { stats },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_on_goal_yields_single_cell_path() {
        let maze = Maze::open(3).expect("valid dimension");
        let cell = CellCoord::new(1, 1);

        for algorithm in Algorithm::ALL {
            let query = SearchQuery::new(algorithm).from(cell).to(cell);
            let outcome = solve(&maze, &query);
            let path = outcome.path().expect("trivial path");
            assert_eq!(path.length(), 0);
            assert_eq!(outcome.stats(), SearchStats::new(1, 1));
        }
    }

    #[test]
    fn blocked_or_burning_endpoints_have_no_path() {
        let maze = Maze::parse("...\n.#.\n..*\n").expect("valid layout");

        let into_fire = solve(&maze, &SearchQuery::a_star(Heuristic::Euclidean));
        assert!(!into_fire.is_found());
        assert_eq!(into_fire.stats(), SearchStats::default());

        let through_fire = solve(&maze, &SearchQuery::new(Algorithm::BreadthFirst));
        assert!(through_fire.is_found());

        let from_wall = SearchQuery::new(Algorithm::BreadthFirst).from(CellCoord::new(1, 1));
        assert!(!solve(&maze, &from_wall).is_found());

        let outside = SearchQuery::new(Algorithm::DepthFirst).to(CellCoord::new(9, 9));
        assert!(!solve(&maze, &outside).is_found());
    }

    #[test]
    fn query_defaults_follow_the_algorithm() {
        let informed = SearchQuery::new(Algorithm::AStar);
        assert!(informed.avoids_fire());
        assert_eq!(informed.heuristic(), Heuristic::Manhattan);

        let uninformed = SearchQuery::new(Algorithm::DepthFirst);
        assert!(!uninformed.avoids_fire());
        assert!(uninformed.avoiding_fire(true).avoids_fire());
    }
}
