#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for the maze-on-fire engine.
//!
//! The [`Maze`] is the only shared mutable resource in the engine. Solvers
//! read it, the hardening engine flips individual cells, and the fire
//! simulator ignites cells monotonically. All per-search scratch data lives
//! outside the grid so a maze can be cloned or reused across trials without
//! carrying stale search state.

mod distance;

use std::fmt;

use maze_fire_core::{CellCoord, Direction, MazeError};
use serde::{Deserialize, Serialize};

pub use distance::DistanceField;

const OPEN_TILE: char = '.';
const BLOCKED_TILE: char = '#';
const FIRE_TILE: char = '*';

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    blocked: bool,
    on_fire: bool,
}

impl Cell {
    /// Reports whether the cell is an obstacle.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Reports whether the cell is currently burning.
    #[must_use]
    pub const fn is_on_fire(&self) -> bool {
        self.on_fire
    }
}

/// Square grid of cells with the start in the upper-left corner and the goal
/// in the lower-right corner.
///
/// The start and goal are never blocked and a blocked cell never burns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MazeCells")]
pub struct Maze {
    dimension: u32,
    cells: Vec<Cell>,
}

/// Unchecked wire form of a [`Maze`].
#[derive(Deserialize)]
struct MazeCells {
    dimension: u32,
    cells: Vec<Cell>,
}

impl TryFrom<MazeCells> for Maze {
    type Error = MazeError;

    fn try_from(raw: MazeCells) -> Result<Self, Self::Error> {
        if raw.dimension == 0 {
            return Err(MazeError::ZeroDimension);
        }
        let side = usize::try_from(raw.dimension).map_err(|_| MazeError::ZeroDimension)?;
        if side.checked_mul(side) != Some(raw.cells.len()) {
            return Err(MazeError::CellCountMismatch {
                dimension: raw.dimension,
                found: raw.cells.len(),
            });
        }

        let maze = Self {
            dimension: raw.dimension,
            cells: raw.cells,
        };
        if let Some((cell, _)) = maze.iter().find(|(_, state)| state.blocked && state.on_fire) {
            return Err(MazeError::BurningObstacle { cell });
        }
        maze.checked()
    }
}

impl Maze {
    /// Creates a maze of the provided dimension with every cell open.
    pub fn open(dimension: u32) -> Result<Self, MazeError> {
        Self::from_fn(dimension, |_| false)
    }

    /// Creates a maze whose blocked cells are chosen by `is_blocked`.
    ///
    /// Cells are visited in row-major order. The start and goal are forced
    /// open regardless of the closure's answer.
    pub fn from_fn<F>(dimension: u32, mut is_blocked: F) -> Result<Self, MazeError>
    where
        F: FnMut(CellCoord) -> bool,
    {
        if dimension == 0 {
            return Err(MazeError::ZeroDimension);
        }

        let side = usize::try_from(dimension).map_err(|_| MazeError::ZeroDimension)?;
        let mut cells = Vec::with_capacity(side * side);
        for row in 0..dimension {
            for column in 0..dimension {
                cells.push(Cell {
                    blocked: is_blocked(CellCoord::new(row, column)),
                    on_fire: false,
                });
            }
        }

        let mut maze = Self { dimension, cells };
        let start = maze.start();
        let goal = maze.goal();
        for endpoint in [start, goal] {
            if let Some(cell) = maze.cell_mut(endpoint) {
                cell.blocked = false;
            }
        }
        Ok(maze)
    }

    /// Parses a square text layout: `.` open, `#` blocked, `*` burning.
    ///
    /// Blank lines and surrounding whitespace are ignored. Unlike
    /// [`Maze::from_fn`], blocked endpoints and a burning start are reported
    /// as errors rather than silently repaired.
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(MazeError::EmptyLayout);
        }

        let dimension = u32::try_from(rows.len()).map_err(|_| MazeError::EmptyLayout)?;
        let mut cells = Vec::with_capacity(rows.len() * rows.len());
        for (row, line) in (0..dimension).zip(rows) {
            let found = u32::try_from(line.chars().count()).unwrap_or(u32::MAX);
            if found != dimension {
                return Err(MazeError::RaggedLayout {
                    row,
                    expected: dimension,
                    found,
                });
            }

            for (column, tile) in (0..dimension).zip(line.chars()) {
                let cell = match tile {
                    OPEN_TILE => Cell::default(),
                    BLOCKED_TILE => Cell {
                        blocked: true,
                        on_fire: false,
                    },
                    FIRE_TILE => Cell {
                        blocked: false,
                        on_fire: true,
                    },
                    _ => return Err(MazeError::UnknownTile { tile, row, column }),
                };
                cells.push(cell);
            }
        }

        Self { dimension, cells }.checked()
    }

    /// Rejects blocked endpoints and a burning start.
    fn checked(self) -> Result<Self, MazeError> {
        for endpoint in [self.start(), self.goal()] {
            if self.is_blocked(endpoint) {
                return Err(MazeError::EndpointBlocked { cell: endpoint });
            }
        }
        if self.is_on_fire(self.start()) {
            return Err(MazeError::FireAtStart);
        }
        Ok(self)
    }

    /// Number of rows (and columns) in the maze.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Total number of cells in the maze.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Upper-left corner where every search starts by default.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(0, 0)
    }

    /// Lower-right corner every search targets by default.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        CellCoord::new(self.dimension - 1, self.dimension - 1)
    }

    /// Reports whether the coordinate lies inside the maze.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.dimension && cell.column() < self.dimension
    }

    /// Dense row-major index of the cell, if it lies inside the maze.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.dimension).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Coordinate of the cell stored at the provided row-major index.
    #[must_use]
    pub fn coord(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cells.len() {
            return None;
        }

        let width = usize::try_from(self.dimension).ok()?;
        let row = u32::try_from(index / width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        Some(CellCoord::new(row, column))
    }

    /// State of the cell at the provided coordinate.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    fn cell_mut(&mut self, cell: CellCoord) -> Option<&mut Cell> {
        let index = self.index(cell)?;
        self.cells.get_mut(index)
    }

    /// Reports whether the cell is an obstacle. Cells outside the maze count as blocked.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.cell(cell).map_or(true, |state| state.blocked)
    }

    /// Reports whether the cell is currently burning.
    #[must_use]
    pub fn is_on_fire(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_some_and(|state| state.on_fire)
    }

    /// Reports whether a search may step onto the cell.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord, avoid_fire: bool) -> bool {
        self.cell(cell)
            .is_some_and(|state| !state.blocked && !(avoid_fire && state.on_fire))
    }

    /// In-bounds neighbours of `cell` in search order: up, left, down, right.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let dimension = self.dimension;
        Direction::SEARCH_ORDER
            .into_iter()
            .filter_map(move |direction| cell.step(direction, dimension))
    }

    /// Number of direct neighbours of `cell` that are burning.
    #[must_use]
    pub fn burning_neighbors(&self, cell: CellCoord) -> u32 {
        let count = self
            .neighbors(cell)
            .filter(|neighbor| self.is_on_fire(*neighbor))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Flips the blocked flag of `cell`, returning whether the flip happened.
    ///
    /// The start, the goal, burning cells and coordinates outside the maze are
    /// left untouched.
    pub fn toggle_blocked(&mut self, cell: CellCoord) -> bool {
        if cell == self.start() || cell == self.goal() {
            return false;
        }

        match self.cell_mut(cell) {
            Some(state) if !state.on_fire => {
                state.blocked = !state.blocked;
                true
            }
            _ => false,
        }
    }

    /// Sets the cell on fire, returning whether it newly ignited.
    ///
    /// Blocked cells and coordinates outside the maze never burn.
    pub fn ignite(&mut self, cell: CellCoord) -> bool {
        match self.cell_mut(cell) {
            Some(state) if !state.blocked && !state.on_fire => {
                state.on_fire = true;
                true
            }
            _ => false,
        }
    }

    /// Iterator over every cell and its coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| Some((self.coord(index)?, *cell)))
    }

    /// Coordinates of every open cell, in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(|(_, cell)| !cell.blocked)
            .map(|(coord, _)| coord)
    }

    /// Coordinates of every burning cell, in row-major order.
    pub fn burning_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(|(_, cell)| cell.on_fire)
            .map(|(coord, _)| coord)
    }

    /// First burning cell in row-major order, typically the fire's origin on
    /// a freshly generated maze.
    #[must_use]
    pub fn initial_fire(&self) -> Option<CellCoord> {
        self.burning_cells().next()
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (coord, cell) in self.iter() {
            let tile = if cell.blocked {
                BLOCKED_TILE
            } else if cell.on_fire {
                FIRE_TILE
            } else {
                OPEN_TILE
            };
            write!(f, "{tile}")?;
            if coord.column() + 1 == self.dimension {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
