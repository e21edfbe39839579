//! Breadth-first distance field over a maze.

use std::collections::VecDeque;

use maze_fire_core::CellCoord;

use crate::Maze;

/// Dense grid-step distances from a set of source cells.
///
/// The field mirrors the maze dimensions and stores the breadth-first search
/// results seeded from every source. Distances default to `u32::MAX` for
/// unreachable cells so callers can distinguish walls from traversable tiles.
#[derive(Clone, Debug, Default)]
pub struct DistanceField {
    dimension: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Builds a field from `sources`, stepping only onto cells accepted by `is_passable`.
    #[must_use]
    pub fn from_sources<F>(maze: &Maze, sources: &[CellCoord], is_passable: F) -> Self
    where
        F: FnMut(CellCoord) -> bool,
    {
        let mut field = Self::default();
        field.rebuild_with(maze, sources, is_passable);
        field
    }

    /// Rebuilds the distances using a breadth-first search from `sources`.
    ///
    /// Sources are seeded even when `is_passable` rejects them, which lets a
    /// burning cell act as the origin of a reachability query.
    pub fn rebuild_with<F>(&mut self, maze: &Maze, sources: &[CellCoord], mut is_passable: F)
    where
        F: FnMut(CellCoord) -> bool,
    {
        let cell_count = maze.cell_count();
        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }
        self.dimension = maze.dimension();

        let mut queue = VecDeque::new();

        for &source in sources {
            let Some(index) = maze.index(source) else {
                continue;
            };

            if self.distances[index] == 0 {
                continue;
            }

            self.distances[index] = 0;
            queue.push_back(source);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = maze.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in maze.neighbors(cell) {
                if !is_passable(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = maze.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Dimension of the maze the field was built for.
    #[must_use]
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Distance captured for the provided cell, or `None` when it is
    /// unreachable or outside the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.row() >= self.dimension || cell.column() >= self.dimension {
            return None;
        }

        let width = usize::try_from(self.dimension).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        self.distances
            .get(row * width + column)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    /// Reports whether the cell was reached from any source.
    #[must_use]
    pub fn reaches(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some()
    }
}
