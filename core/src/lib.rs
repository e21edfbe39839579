#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze-on-fire engine.
//!
//! This crate defines the value types that connect the authoritative maze
//! grid, the pure search and simulation systems, and the adapters that render
//! or report their results. Systems receive a [`CellCoord`]-addressed maze,
//! describe what they found with [`Path`] and [`SearchStats`], and report
//! configuration problems through [`MazeError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Computes the straight-line distance between the centres of two cells.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f64 {
        let rows = f64::from(self.row.abs_diff(other.row));
        let columns = f64::from(self.column.abs_diff(other.column));
        rows.hypot(columns)
    }

    /// Returns the neighbouring cell one step in `direction`, if it stays
    /// inside a square grid of the provided dimension.
    #[must_use]
    pub fn step(self, direction: Direction, dimension: u32) -> Option<CellCoord> {
        let (row, column) = match direction {
            Direction::North => (self.row.checked_sub(1)?, self.column),
            Direction::West => (self.row, self.column.checked_sub(1)?),
            Direction::South => (self.row.checked_add(1)?, self.column),
            Direction::East => (self.row, self.column.checked_add(1)?),
        };

        if row >= dimension || column >= dimension {
            return None;
        }

        Some(CellCoord::new(row, column))
    }
}

/// Cardinal movement directions available on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Order in which solvers expand neighbours: up, left, down, right.
    ///
    /// Depth-first search pushes neighbours in this order, so the last entry
    /// is explored first. The hardening engine's frontier metric depends on it.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];
}

/// Workload counters collected by a single solver invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchStats {
    expanded: usize,
    max_frontier: usize,
}

impl SearchStats {
    /// Creates statistics with explicit counter values.
    #[must_use]
    pub const fn new(expanded: usize, max_frontier: usize) -> Self {
        Self {
            expanded,
            max_frontier,
        }
    }

    /// Number of cells popped from the frontier and expanded.
    #[must_use]
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Largest frontier size observed during the search.
    #[must_use]
    pub const fn max_frontier(&self) -> usize {
        self.max_frontier
    }

    /// Records that one more cell was expanded.
    pub fn record_expansion(&mut self) {
        self.expanded += 1;
    }

    /// Folds the current frontier size into the running maximum.
    pub fn observe_frontier(&mut self, size: usize) {
        self.max_frontier = self.max_frontier.max(size);
    }
}

/// Ordered route through the maze, starting at the search origin.
///
/// A path always contains at least one cell. Its [`Path::length`] counts
/// moves, so a path that starts on its goal has length zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PathCells")]
pub struct Path {
    cells: Vec<CellCoord>,
}

/// Unchecked wire form of a [`Path`].
#[derive(Deserialize)]
struct PathCells {
    cells: Vec<CellCoord>,
}

impl TryFrom<PathCells> for Path {
    type Error = MazeError;

    fn try_from(raw: PathCells) -> Result<Self, Self::Error> {
        Path::new(raw.cells).ok_or(MazeError::EmptyPath)
    }
}

impl Path {
    /// Wraps the provided cells, returning `None` when the list is empty.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells })
        }
    }

    /// Cells visited by the path, origin first.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> CellCoord {
        self.cells[0]
    }

    /// Final cell of the path.
    #[must_use]
    pub fn goal(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Number of moves required to walk the path.
    #[must_use]
    pub fn length(&self) -> usize {
        self.cells.len() - 1
    }

    /// Reports whether the path visits the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns the remainder of the path beginning at `cell`, if it is on the path.
    #[must_use]
    pub fn from_cell(&self, cell: CellCoord) -> Option<Path> {
        let offset = self.cells.iter().position(|candidate| *candidate == cell)?;
        Path::new(self.cells[offset..].to_vec())
    }

    /// Iterator over the cells of the path, origin first.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Consumes the path, yielding the underlying cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Search algorithms offered by the solver system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// First-in first-out frontier.
    BreadthFirst,
    /// Last-in first-out frontier.
    DepthFirst,
    /// Two breadth-first frontiers grown from start and goal until they meet.
    Bidirectional,
    /// Best-first search ordered by path cost plus heuristic.
    AStar,
}

impl Algorithm {
    /// Every algorithm, in the order reports list them.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::DepthFirst,
        Algorithm::BreadthFirst,
        Algorithm::Bidirectional,
        Algorithm::AStar,
    ];

    /// Reports whether the algorithm consults a heuristic.
    #[must_use]
    pub const fn is_informed(self) -> bool {
        matches!(self, Algorithm::AStar)
    }
}

/// Remaining-distance estimates available to A*.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Heuristic {
    /// Straight-line distance to the goal.
    Euclidean,
    /// Grid-step distance to the goal.
    Manhattan,
    /// Euclidean distance inflated by each cell's chance of igniting next
    /// step, clamped to the Manhattan distance.
    FireRisk {
        /// Per-neighbour contagion probability used to estimate the risk.
        flammability: f64,
    },
}

/// Scalar workload used as the fitness function when hardening mazes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardnessMetric {
    /// Largest frontier observed by depth-first search.
    MaxFrontier,
    /// Cells expanded by A* with the Manhattan heuristic.
    ExpandedCells,
}

impl HardnessMetric {
    /// Algorithm whose workload the metric measures.
    #[must_use]
    pub const fn algorithm(self) -> Algorithm {
        match self {
            Self::MaxFrontier => Algorithm::DepthFirst,
            Self::ExpandedCells => Algorithm::AStar,
        }
    }

    /// Heuristic the oracle solver runs with.
    #[must_use]
    pub const fn heuristic(self) -> Heuristic {
        Heuristic::Manhattan
    }

    /// Extracts the fitness value from a solver's statistics.
    #[must_use]
    pub const fn score(self, stats: &SearchStats) -> usize {
        match self {
            Self::MaxFrontier => stats.max_frontier(),
            Self::ExpandedCells => stats.expanded(),
        }
    }
}

/// Real-time policies for escaping a burning maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Follow the initial plan without ever replanning.
    Ignore,
    /// Replan around burning cells after every fire step.
    Avoid,
    /// Replan after every fire step, preferring cells unlikely to ignite.
    Predict,
}

impl StrategyKind {
    /// Every strategy, in the order reports list them.
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Ignore,
        StrategyKind::Avoid,
        StrategyKind::Predict,
    ];
}

/// Probability that a cell with `burning_neighbors` burning neighbours
/// ignites during one fire step at flammability `q`.
#[must_use]
pub fn ignition_probability(flammability: f64, burning_neighbors: u32) -> f64 {
    if burning_neighbors == 0 {
        return 0.0;
    }

    let exponent = i32::try_from(burning_neighbors).unwrap_or(i32::MAX);
    1.0 - (1.0 - flammability).powi(exponent)
}

/// Checks that `value` is a probability, naming the parameter on failure.
pub fn validate_probability(name: &'static str, value: f64) -> Result<f64, MazeError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(MazeError::ProbabilityOutOfRange { name, value })
    }
}

/// Reasons a maze could not be built or configured.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MazeError {
    /// A maze needs at least one cell.
    #[error("maze dimension must be at least 1")]
    ZeroDimension,
    /// A probability parameter fell outside `[0, 1]`.
    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value that was supplied.
        value: f64,
    },
    /// Fire was requested but no open cell other than the start exists.
    #[error("no open cell besides the start is available to ignite in a {dimension}x{dimension} maze")]
    NoIgnitionSite {
        /// Dimension of the maze that was generated.
        dimension: u32,
    },
    /// A text layout contained no rows.
    #[error("maze layout is empty")]
    EmptyLayout,
    /// A text layout row had the wrong number of tiles.
    #[error("layout row {row} has {found} tiles, expected {expected}")]
    RaggedLayout {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width implied by the number of rows.
        expected: u32,
        /// Width actually found.
        found: u32,
    },
    /// A text layout contained an unrecognized tile.
    #[error("unknown tile {tile:?} at ({row}, {column})")]
    UnknownTile {
        /// The character that could not be interpreted.
        tile: char,
        /// Row containing the tile.
        row: u32,
        /// Column containing the tile.
        column: u32,
    },
    /// The start or goal cell was blocked.
    #[error("endpoint ({}, {}) must be open", cell.row(), cell.column())]
    EndpointBlocked {
        /// The blocked endpoint.
        cell: CellCoord,
    },
    /// The start cell was set on fire.
    #[error("the start cell cannot begin on fire")]
    FireAtStart,
    /// A blocked cell was marked as burning.
    #[error("blocked cell ({}, {}) cannot burn", cell.row(), cell.column())]
    BurningObstacle {
        /// The offending cell.
        cell: CellCoord,
    },
    /// Stored cells do not fill a square of the stated dimension.
    #[error("a {dimension}x{dimension} maze cannot hold {found} cells")]
    CellCountMismatch {
        /// Stated dimension of the maze.
        dimension: u32,
        /// Number of cells actually supplied.
        found: usize,
    },
    /// A path must visit at least one cell.
    #[error("a path needs at least one cell")]
    EmptyPath,
}
