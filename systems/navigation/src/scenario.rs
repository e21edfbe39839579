//! Generation of fire mazes worth escaping from.

use maze_fire_core::{validate_probability, CellCoord, MazeError, StrategyKind};
use maze_fire_system_generation::{GenerationConfig, MazeGenerator};
use maze_fire_world::{DistanceField, Maze};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::initial_plan;

/// Parameters of generated escape scenarios.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioConfig {
    /// Dimension of the square maze.
    pub dimension: u32,
    /// Probability that a cell is blocked.
    pub density: f64,
    /// Per-neighbour contagion probability of the fire.
    pub flammability: f64,
    /// Mazes generated before giving up.
    pub max_attempts: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            dimension: 100,
            density: 0.28,
            flammability: 0.3,
            max_attempts: 1_000,
        }
    }
}

/// A fire maze in which the fire can reach the start and the goal is
/// reachable from the start at time zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    /// Maze with its single initial fire cell.
    pub maze: Maze,
    /// Cell where the fire started.
    pub fire_origin: CellCoord,
    /// Mazes generated, this one included.
    pub attempts: usize,
}

/// Failures while generating a scenario.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ScenarioError {
    /// No viable maze appeared within the attempt budget.
    #[error("no viable fire maze found in {attempts} attempts")]
    Exhausted {
        /// Mazes generated before giving up.
        attempts: usize,
    },
    /// The scenario configuration was rejected.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Generates fire mazes until one is viable: the fire can spread to the
/// start cell through open cells, and a fire-free route to the goal exists.
pub fn viable_scenario<R>(config: &ScenarioConfig, rng: &mut R) -> Result<Scenario, ScenarioError>
where
    R: Rng + ?Sized,
{
    let _ = validate_probability("flammability", config.flammability)?;
    let generator = MazeGenerator::new(GenerationConfig {
        dimension: config.dimension,
        density: config.density,
        with_fire: true,
    })?;

    let mut field = DistanceField::default();
    for attempt in 1..=config.max_attempts {
        let maze = generator.generate(rng)?;
        let Some(fire_origin) = maze.initial_fire() else {
            continue;
        };

        field.rebuild_with(&maze, &[fire_origin], |cell| !maze.is_blocked(cell));
        if !field.reaches(maze.start()) {
            debug!(attempt, "fire cannot reach the start");
            continue;
        }
        if initial_plan(StrategyKind::Avoid, &maze, config.flammability).is_none() {
            debug!(attempt, "no route from start to goal");
            continue;
        }

        return Ok(Scenario {
            maze,
            fire_origin,
            attempts: attempt,
        });
    }

    warn!(
        attempts = config.max_attempts,
        density = config.density,
        "gave up generating a viable fire maze"
    );
    Err(ScenarioError::Exhausted {
        attempts: config.max_attempts,
    })
}
