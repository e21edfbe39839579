use std::collections::VecDeque;

use maze_fire_core::SearchStats;
use maze_fire_world::Maze;

use crate::{finish, Endpoints, SearchOutcome, SearchWorkspace};

/// Order in which the frontier releases cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Discipline {
    /// Oldest cell first (breadth-first).
    Fifo,
    /// Newest cell first (depth-first).
    Lifo,
}

pub(crate) fn search(
    workspace: &mut SearchWorkspace,
    maze: &Maze,
    endpoints: Endpoints,
    discipline: Discipline,
) -> SearchOutcome {
    let tree = &mut workspace.forward;
    let mut stats = SearchStats::default();
    let mut frontier = VecDeque::new();

    tree.seed(endpoints.start);
    frontier.push_back(endpoints.start);
    stats.observe_frontier(frontier.len());

    loop {
        let next = match discipline {
            Discipline::Fifo => frontier.pop_front(),
            Discipline::Lifo => frontier.pop_back(),
        };
        let Some(index) = next else {
            return finish(None, stats);
        };

        tree.mark_visited(index);
        stats.record_expansion();
        if index == endpoints.goal {
            return finish(tree.trace(maze, index), stats);
        }

        let Some(cell) = maze.coord(index) else {
            continue;
        };
        let distance = tree.distance(index).saturating_add(1);
        for neighbor in maze.neighbors(cell) {
            if !endpoints.is_passable(maze, neighbor) {
                continue;
            }
            let Some(neighbor_index) = maze.index(neighbor) else {
                continue;
            };
            if tree.is_visited(neighbor_index) || tree.is_discovered(neighbor_index) {
                continue;
            }

            tree.link(neighbor_index, index, distance);
            frontier.push_back(neighbor_index);
        }
        stats.observe_frontier(frontier.len());
    }
}
