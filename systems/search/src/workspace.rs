//! Scratch state reused across solver invocations.

use maze_fire_core::{CellCoord, Path};
use maze_fire_world::Maze;

/// Predecessor links, discovery marks and distances for one search direction.
#[derive(Clone, Debug, Default)]
pub(crate) struct SearchTree {
    parents: Vec<Option<usize>>,
    discovered: Vec<bool>,
    visited: Vec<bool>,
    distances: Vec<u32>,
}

impl SearchTree {
    fn reset(&mut self, cell_count: usize) {
        reset_buffer(&mut self.parents, cell_count, None);
        reset_buffer(&mut self.discovered, cell_count, false);
        reset_buffer(&mut self.visited, cell_count, false);
        reset_buffer(&mut self.distances, cell_count, u32::MAX);
    }

    fn is_clear(&self) -> bool {
        self.parents.iter().all(Option::is_none)
            && !self.discovered.iter().any(|flag| *flag)
            && !self.visited.iter().any(|flag| *flag)
    }

    /// Marks `index` as the root of the tree.
    pub(crate) fn seed(&mut self, index: usize) {
        self.discovered[index] = true;
        self.distances[index] = 0;
    }

    /// Links `index` beneath `parent` at the provided distance.
    pub(crate) fn link(&mut self, index: usize, parent: usize, distance: u32) {
        self.discovered[index] = true;
        self.parents[index] = Some(parent);
        self.distances[index] = distance;
    }

    pub(crate) fn mark_visited(&mut self, index: usize) {
        self.visited[index] = true;
    }

    pub(crate) fn is_discovered(&self, index: usize) -> bool {
        self.discovered[index]
    }

    pub(crate) fn is_visited(&self, index: usize) -> bool {
        self.visited[index]
    }

    pub(crate) fn distance(&self, index: usize) -> u32 {
        self.distances[index]
    }

    /// Walks predecessors from `index` back to the root and returns the
    /// route root first.
    pub(crate) fn trace(&self, maze: &Maze, index: usize) -> Option<Path> {
        let mut cells = Vec::new();
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            if cells.len() > self.parents.len() {
                return None;
            }
            cells.push(maze.coord(current)?);
            cursor = self.parents[current];
        }
        cells.reverse();
        Path::new(cells)
    }
}

fn reset_buffer<T: Copy>(buffer: &mut Vec<T>, len: usize, value: T) {
    if buffer.len() == len {
        buffer.fill(value);
    } else {
        buffer.clear();
        buffer.resize(len, value);
    }
}

/// Reusable scratch state for every solver.
///
/// Holds the predecessor tables that replace per-cell back-references, the
/// visited and queued marks, the distance table used by A* and bidirectional
/// search, and the ignition risk map of the fire-aware heuristic. Every solve
/// resets the workspace before it starts.
#[derive(Clone, Debug, Default)]
pub struct SearchWorkspace {
    dimension: u32,
    pub(crate) forward: SearchTree,
    pub(crate) backward: SearchTree,
    pub(crate) risk: Vec<f64>,
}

impl SearchWorkspace {
    /// Creates an empty workspace. Buffers are sized on first use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all scratch state and sizes the buffers for `maze`.
    pub fn reset(&mut self, maze: &Maze) {
        let cell_count = maze.cell_count();
        self.dimension = maze.dimension();
        self.forward.reset(cell_count);
        self.backward.reset(cell_count);
        self.risk.clear();
    }

    /// Reports whether no predecessor, discovery or visit mark is set.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.forward.is_clear() && self.backward.is_clear()
    }

    /// Predecessor recorded for `cell` by the most recent search from the start side.
    #[must_use]
    pub fn predecessor(&self, maze: &Maze, cell: CellCoord) -> Option<CellCoord> {
        if maze.dimension() != self.dimension {
            return None;
        }
        let index = maze.index(cell)?;
        self.forward
            .parents
            .get(index)
            .copied()
            .flatten()
            .and_then(|parent| maze.coord(parent))
    }
}

/// Clears every predecessor, mark and distance held by `workspace` so it can
/// serve a new search on `maze`.
pub fn reset_scratch_state(workspace: &mut SearchWorkspace, maze: &Maze) {
    workspace.reset(maze);
}
