#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stochastic fire spread over a maze.
//!
//! Each step every open, non-burning cell ignites with probability
//! `1 - (1 - q)^k`, where `k` counts its burning neighbours and `q` is the
//! flammability. Ignitions are applied together once the whole grid has been
//! sampled, so a freshly ignited cell only spreads fire on the next step.

use maze_fire_core::{ignition_probability, validate_probability, CellCoord, MazeError};
use maze_fire_world::Maze;
use rand::Rng;
use tracing::trace;

/// Fire simulator bound to a single flammability rate.
#[derive(Clone, Debug)]
pub struct FireSpread {
    flammability: f64,
    scheduled: Vec<CellCoord>,
}

impl FireSpread {
    /// Creates a simulator after validating that `flammability` lies in `[0, 1]`.
    pub fn new(flammability: f64) -> Result<Self, MazeError> {
        let flammability = validate_probability("flammability", flammability)?;
        Ok(Self {
            flammability,
            scheduled: Vec::new(),
        })
    }

    /// Per-neighbour contagion probability.
    #[must_use]
    pub fn flammability(&self) -> f64 {
        self.flammability
    }

    /// Advances the fire by one synchronous step and returns how many cells ignited.
    pub fn step<R>(&mut self, maze: &mut Maze, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        self.scheduled.clear();

        for (coord, cell) in maze.iter() {
            if cell.is_blocked() || cell.is_on_fire() {
                continue;
            }

            let burning = maze.burning_neighbors(coord);
            if burning == 0 {
                continue;
            }

            let probability = ignition_probability(self.flammability, burning);
            let mut draw: f64 = rng.gen();
            while draw == 0.0 {
                draw = rng.gen();
            }
            if draw <= probability {
                self.scheduled.push(coord);
            }
        }

        let ignited = self
            .scheduled
            .iter()
            .filter(|coord| maze.ignite(**coord))
            .count();
        trace!(ignited, flammability = self.flammability, "fire advanced");
        ignited
    }
}

/// Advances the fire on `maze` by one step at the provided flammability.
pub fn spread_fire<R>(maze: &mut Maze, flammability: f64, rng: &mut R) -> Result<usize, MazeError>
where
    R: Rng + ?Sized,
{
    Ok(FireSpread::new(flammability)?.step(maze, rng))
}

/// Probability of each cell igniting during the next step, in row-major order.
///
/// Blocked and already burning cells carry a risk of zero.
#[must_use]
pub fn ignition_risk_map(maze: &Maze, flammability: f64) -> Vec<f64> {
    let mut risk = Vec::new();
    fill_ignition_risk(maze, flammability, &mut risk);
    risk
}

/// Writes the ignition risk of every cell into `out`, reusing its allocation.
pub fn fill_ignition_risk(maze: &Maze, flammability: f64, out: &mut Vec<f64>) {
    out.clear();
    out.extend(maze.iter().map(|(coord, cell)| {
        if cell.is_blocked() || cell.is_on_fire() {
            0.0
        } else {
            ignition_probability(flammability, maze.burning_neighbors(coord))
        }
    }));
}
