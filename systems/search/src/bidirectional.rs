//! Breadth-first search grown from both ends of the maze.
//!
//! The two frontiers take turns expanding one full ply. Whenever a cell
//! generated by one side has already been discovered by the other, the pair
//! of adjacent cells is a meeting. The shortest meeting of the first ply that
//! produces one is a shortest route, and ends the search.

use std::collections::{HashSet, VecDeque};

use maze_fire_core::{CellCoord, Path, SearchStats};
use maze_fire_world::Maze;

use crate::workspace::SearchTree;
use crate::{finish, Endpoints, SearchOutcome, SearchWorkspace};

/// Adjacent cells where the two search trees touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Meeting {
    /// Cell owned by the expanding side.
    own: usize,
    /// Neighbour already discovered by the opposite side.
    other: usize,
    /// Length of the start-to-goal route through the pair.
    length: u32,
}

pub(crate) fn search(
    workspace: &mut SearchWorkspace,
    maze: &Maze,
    endpoints: Endpoints,
) -> SearchOutcome {
    let SearchWorkspace {
        forward, backward, ..
    } = workspace;
    let mut stats = SearchStats::default();
    let mut forward_frontier = VecDeque::from([endpoints.start]);
    let mut backward_frontier = VecDeque::from([endpoints.goal]);
    forward.seed(endpoints.start);
    backward.seed(endpoints.goal);
    stats.observe_frontier(forward_frontier.len() + backward_frontier.len());

    let mut forward_turn = true;
    loop {
        if forward_frontier.is_empty() || backward_frontier.is_empty() {
            return finish(None, stats);
        }

        let meeting = if forward_turn {
            expand_ply(
                maze,
                &endpoints,
                forward,
                backward,
                &mut forward_frontier,
                backward_frontier.len(),
                &mut stats,
            )
        } else {
            expand_ply(
                maze,
                &endpoints,
                backward,
                forward,
                &mut backward_frontier,
                forward_frontier.len(),
                &mut stats,
            )
        };

        if let Some(meeting) = meeting {
            let (forward_end, backward_end) = if forward_turn {
                (meeting.own, meeting.other)
            } else {
                (meeting.other, meeting.own)
            };
            let path = forward
                .trace(maze, forward_end)
                .zip(backward.trace(maze, backward_end))
                .and_then(|(head, tail)| stitch(head.cells(), tail.cells()));
            return finish(path, stats);
        }

        forward_turn = !forward_turn;
    }
}

/// Expands every cell currently queued on one side and reports the shortest
/// meeting with the opposite tree, if any.
fn expand_ply(
    maze: &Maze,
    endpoints: &Endpoints,
    own: &mut SearchTree,
    other: &SearchTree,
    frontier: &mut VecDeque<usize>,
    other_frontier: usize,
    stats: &mut SearchStats,
) -> Option<Meeting> {
    let mut best: Option<Meeting> = None;

    for _ in 0..frontier.len() {
        let Some(index) = frontier.pop_front() else {
            break;
        };
        own.mark_visited(index);
        stats.record_expansion();

        let Some(cell) = maze.coord(index) else {
            continue;
        };
        let distance = own.distance(index).saturating_add(1);
        for neighbor in maze.neighbors(cell) {
            if !endpoints.is_passable(maze, neighbor) {
                continue;
            }
            let Some(neighbor_index) = maze.index(neighbor) else {
                continue;
            };

            if other.is_discovered(neighbor_index) {
                let length = distance.saturating_add(other.distance(neighbor_index));
                if best.map_or(true, |current| length < current.length) {
                    best = Some(Meeting {
                        own: index,
                        other: neighbor_index,
                        length,
                    });
                }
            }

            if own.is_discovered(neighbor_index) {
                continue;
            }
            own.link(neighbor_index, index, distance);
            frontier.push_back(neighbor_index);
        }
        stats.observe_frontier(frontier.len() + other_frontier);
    }

    best
}

/// Splices a start-side fragment onto a goal-side fragment.
///
/// `forward` runs from the start to the forward tree's meeting cell and
/// `backward` runs from the goal to the backward tree's meeting cell. The
/// goal-side fragment is reversed so the result reads start to goal. When
/// both fragments end on the same cell it appears once. Returns `None` when
/// either fragment is empty or the splice would visit a cell twice.
#[must_use]
pub fn stitch(forward: &[CellCoord], backward: &[CellCoord]) -> Option<Path> {
    let (Some(&forward_end), Some(&backward_end)) = (forward.last(), backward.last()) else {
        return None;
    };

    let shared = usize::from(forward_end == backward_end);
    let mut cells = Vec::with_capacity(forward.len() + backward.len() - shared);
    cells.extend_from_slice(forward);
    cells.extend(backward.iter().rev().skip(shared).copied());

    let mut seen = HashSet::with_capacity(cells.len());
    if !cells.iter().all(|cell| seen.insert(*cell)) {
        return None;
    }

    Path::new(cells)
}

#[cfg(test)]
mod tests {
    use super::stitch;
    use maze_fire_core::CellCoord;

    fn cells(raw: &[(u32, u32)]) -> Vec<CellCoord> {
        raw.iter()
            .map(|&(row, column)| CellCoord::new(row, column))
            .collect()
    }

    #[test]
    fn stitch_reverses_the_goal_side_fragment() {
        let forward = cells(&[(0, 0), (0, 1)]);
        let backward = cells(&[(2, 2), (1, 2), (1, 1)]);

        let path = stitch(&forward, &backward).expect("disjoint fragments");

        assert_eq!(path.cells(), cells(&[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)]));
        assert_eq!(path.length(), 4);
    }

    #[test]
    fn stitch_keeps_a_shared_meeting_cell_once() {
        let forward = cells(&[(0, 0), (0, 1), (1, 1)]);
        let backward = cells(&[(2, 2), (2, 1), (1, 1)]);

        let path = stitch(&forward, &backward).expect("fragments meet");

        assert_eq!(path.cells(), cells(&[(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)]));
    }

    #[test]
    fn stitch_rejects_cycles_and_empty_fragments() {
        let forward = cells(&[(0, 0), (0, 1), (1, 1)]);
        let looping = cells(&[(1, 2), (0, 1), (0, 2)]);

        assert!(stitch(&forward, &looping).is_none());
        assert!(stitch(&[], &forward).is_none());
        assert!(stitch(&forward, &[]).is_none());
    }

    #[test]
    fn stitch_of_single_cells_joins_neighbours() {
        let path = stitch(&cells(&[(0, 0)]), &cells(&[(0, 1)])).expect("adjacent");
        assert_eq!(path.start(), CellCoord::new(0, 0));
        assert_eq!(path.goal(), CellCoord::new(0, 1));
    }
}
