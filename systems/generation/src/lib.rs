#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random maze generation.

use maze_fire_core::{validate_probability, MazeError};
use maze_fire_world::Maze;
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

/// Parameters describing the mazes a [`MazeGenerator`] produces.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    /// Number of rows and columns in the square maze.
    pub dimension: u32,
    /// Probability that any single cell is blocked.
    pub density: f64,
    /// Ignite one random open cell (never the start) after generation.
    pub with_fire: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            dimension: 100,
            density: 0.2,
            with_fire: false,
        }
    }
}

/// Produces random mazes. Generated mazes carry no solvability guarantee;
/// callers detect and discard unsolvable ones.
#[derive(Clone, Debug, Default)]
pub struct MazeGenerator {
    config: GenerationConfig,
}

impl MazeGenerator {
    /// Creates a generator after validating the configuration.
    pub fn new(config: GenerationConfig) -> Result<Self, MazeError> {
        if config.dimension == 0 {
            return Err(MazeError::ZeroDimension);
        }
        let _ = validate_probability("density", config.density)?;
        Ok(Self { config })
    }

    /// Configuration the generator was built with.
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a fresh maze using the provided random source.
    pub fn generate<R>(&self, rng: &mut R) -> Result<Maze, MazeError>
    where
        R: Rng + ?Sized,
    {
        let density = self.config.density;
        let mut maze = Maze::from_fn(self.config.dimension, |_| {
            let mut draw: f64 = rng.gen();
            while draw == 0.0 {
                draw = rng.gen();
            }
            draw < density
        })?;

        if self.config.with_fire {
            let start = maze.start();
            let candidates: Vec<_> = maze.open_cells().filter(|cell| *cell != start).collect();
            let Some(&origin) = candidates.choose(rng) else {
                return Err(MazeError::NoIgnitionSite {
                    dimension: self.config.dimension,
                });
            };
            let _ = maze.ignite(origin);
            debug!(
                row = origin.row(),
                column = origin.column(),
                "ignited initial fire"
            );
        }

        Ok(maze)
    }
}

/// Generates a single maze of dimension `dimension` where each cell is
/// blocked with probability `density`.
pub fn generate_maze<R>(
    dimension: u32,
    density: f64,
    with_fire: bool,
    rng: &mut R,
) -> Result<Maze, MazeError>
where
    R: Rng + ?Sized,
{
    MazeGenerator::new(GenerationConfig {
        dimension,
        density,
        with_fire,
    })?
    .generate(rng)
}
