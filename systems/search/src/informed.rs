//! A* over the maze grid.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use maze_fire_core::{CellCoord, Heuristic, SearchStats};
use maze_fire_system_fire::fill_ignition_risk;
use maze_fire_world::Maze;

use crate::{finish, Endpoints, SearchOutcome, SearchWorkspace};

/// Frontier entry. Entries superseded by a cheaper route stay in the heap and
/// are skipped when popped.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    estimate: f64,
    cost: u32,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    // `BinaryHeap` pops the greatest entry: lowest estimate, then deepest cost.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.index.cmp(&self.index))
    }
}

pub(crate) fn search(
    workspace: &mut SearchWorkspace,
    maze: &Maze,
    endpoints: Endpoints,
    heuristic: Heuristic,
) -> SearchOutcome {
    if let Heuristic::FireRisk { flammability } = heuristic {
        fill_ignition_risk(maze, flammability, &mut workspace.risk);
    }
    let SearchWorkspace { forward, risk, .. } = workspace;
    let estimate = |index: usize, cell: CellCoord| {
        remaining_estimate(heuristic, cell, endpoints.goal_cell, risk.get(index).copied())
    };

    let mut stats = SearchStats::default();
    let mut heap = BinaryHeap::new();
    let mut open = 0_usize;

    let Some(start_cell) = maze.coord(endpoints.start) else {
        return finish(None, stats);
    };
    forward.seed(endpoints.start);
    heap.push(OpenEntry {
        estimate: estimate(endpoints.start, start_cell),
        cost: 0,
        index: endpoints.start,
    });
    open += 1;
    stats.observe_frontier(open);

    while let Some(entry) = heap.pop() {
        if forward.is_visited(entry.index) || entry.cost != forward.distance(entry.index) {
            continue;
        }
        open -= 1;

        forward.mark_visited(entry.index);
        stats.record_expansion();
        if entry.index == endpoints.goal {
            return finish(forward.trace(maze, entry.index), stats);
        }

        let Some(cell) = maze.coord(entry.index) else {
            continue;
        };
        let cost = entry.cost.saturating_add(1);
        for neighbor in maze.neighbors(cell) {
            if !endpoints.is_passable(maze, neighbor) {
                continue;
            }
            let Some(neighbor_index) = maze.index(neighbor) else {
                continue;
            };
            if forward.is_visited(neighbor_index) || cost >= forward.distance(neighbor_index) {
                continue;
            }

            if !forward.is_discovered(neighbor_index) {
                open += 1;
            }
            forward.link(neighbor_index, entry.index, cost);
            heap.push(OpenEntry {
                estimate: f64::from(cost) + estimate(neighbor_index, neighbor),
                cost,
                index: neighbor_index,
            });
        }
        stats.observe_frontier(open);
    }

    finish(None, stats)
}

/// Estimated number of steps from `cell` to `goal`.
///
/// The fire-risk estimate inflates the straight-line distance by the cell's
/// ignition risk and caps it at the Manhattan distance so it never exceeds
/// the true remaining cost.
fn remaining_estimate(
    heuristic: Heuristic,
    cell: CellCoord,
    goal: CellCoord,
    risk: Option<f64>,
) -> f64 {
    match heuristic {
        Heuristic::Euclidean => cell.euclidean_distance(goal),
        Heuristic::Manhattan => f64::from(cell.manhattan_distance(goal)),
        Heuristic::FireRisk { .. } => {
            let inflated = cell.euclidean_distance(goal) * (1.0 + risk.unwrap_or(0.0));
            inflated.min(f64::from(cell.manhattan_distance(goal)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_risk_estimate_is_capped_by_manhattan_distance() {
        let goal = CellCoord::new(4, 4);
        let heuristic = Heuristic::FireRisk { flammability: 1.0 };

        let diagonal = CellCoord::new(1, 1);
        let capped = remaining_estimate(heuristic, diagonal, goal, Some(1.0));
        assert_eq!(capped, 6.0);

        let calm = remaining_estimate(heuristic, diagonal, goal, Some(0.0));
        assert!((calm - diagonal.euclidean_distance(goal)).abs() < 1e-12);

        let aligned = CellCoord::new(4, 1);
        assert_eq!(remaining_estimate(heuristic, aligned, goal, Some(0.5)), 3.0);
    }

    #[test]
    fn heap_pops_lowest_estimate_then_deepest_cost() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry {
            estimate: 5.0,
            cost: 1,
            index: 0,
        });
        heap.push(OpenEntry {
            estimate: 4.0,
            cost: 1,
            index: 1,
        });
        heap.push(OpenEntry {
            estimate: 4.0,
            cost: 3,
            index: 2,
        });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|entry| entry.index)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }
}
