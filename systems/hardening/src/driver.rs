//! Multi-restart search for the hardest maze across a density sweep.

use maze_fire_core::{validate_probability, HardnessMetric, MazeError};
use maze_fire_system_generation::{GenerationConfig, MazeGenerator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{HardenedMaze, HardeningError, HardeningLimits, HillClimber, StopReason};

/// Parameters of the restart driver.
#[derive(Clone, Debug, PartialEq)]
pub struct HardestMazeConfig {
    /// Dimension of every generated starting maze.
    pub dimension: u32,
    /// Obstacle densities swept by the driver.
    pub densities: Vec<f64>,
    /// Independent starting mazes generated for each density.
    pub restarts_per_density: usize,
    /// Base seed; restart `n` draws from stream `n` of this seed.
    pub seed: u64,
    /// Cutoffs applied to each individual hill climb.
    pub limits: HardeningLimits,
}

impl Default for HardestMazeConfig {
    fn default() -> Self {
        Self {
            dimension: 30,
            densities: vec![0.1, 0.2, 0.3, 0.4],
            restarts_per_density: 25,
            seed: 0,
            limits: HardeningLimits::default(),
        }
    }
}

/// Hardest maze found by [`find_hardest_maze`].
#[derive(Clone, Debug, PartialEq)]
pub struct HardestMaze {
    /// Report of the winning hill climb.
    pub hardened: HardenedMaze,
    /// Density the winning starting maze was generated with.
    pub density: f64,
    /// Index of the winning restart.
    pub restart: usize,
}

#[derive(Clone, Copy, Debug)]
struct Restart {
    index: usize,
    density: f64,
}

/// Repeats the hill climb from independently generated starting mazes and
/// keeps the hardest result.
///
/// Each restart seeds its own [`ChaCha8Rng`] stream, so the result does not
/// depend on the order restarts run in. Unsolvable starting mazes are
/// skipped. A starting maze that is already a local optimum competes with its
/// own fitness. Ties go to the earliest restart.
pub fn find_hardest_maze(
    config: &HardestMazeConfig,
    metric: HardnessMetric,
) -> Result<HardestMaze, HardeningError> {
    if config.dimension == 0 {
        return Err(MazeError::ZeroDimension.into());
    }
    for density in &config.densities {
        let _ = validate_probability("density", *density)?;
    }

    let restarts: Vec<Restart> = config
        .densities
        .iter()
        .flat_map(|density| {
            (0..config.restarts_per_density).map(move |_| *density)
        })
        .enumerate()
        .map(|(index, density)| Restart { index, density })
        .collect();

    #[cfg(feature = "parallel")]
    let results: Vec<Option<HardestMaze>> = restarts
        .par_iter()
        .map(|restart| run_restart(config, metric, *restart))
        .collect::<Result<_, _>>()?;
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Option<HardestMaze>> = restarts
        .iter()
        .map(|restart| run_restart(config, metric, *restart))
        .collect::<Result<_, _>>()?;

    let hardest = results
        .into_iter()
        .flatten()
        .fold(None, |best: Option<HardestMaze>, candidate| match best {
            Some(best) if best.hardened.fitness() >= candidate.hardened.fitness() => Some(best),
            _ => Some(candidate),
        })
        .ok_or(HardeningError::NoSolvableStart {
            attempts: restarts.len(),
        })?;

    info!(
        metric = ?metric,
        fitness = hardest.hardened.fitness(),
        density = hardest.density,
        restart = hardest.restart,
        "hardest maze selected"
    );
    Ok(hardest)
}

fn run_restart(
    config: &HardestMazeConfig,
    metric: HardnessMetric,
    restart: Restart,
) -> Result<Option<HardestMaze>, HardeningError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    rng.set_stream(restart.index as u64);

    let generator = MazeGenerator::new(GenerationConfig {
        dimension: config.dimension,
        density: restart.density,
        with_fire: false,
    })?;
    let maze = generator.generate(&mut rng)?;

    let mut climber = HillClimber::new(metric);
    let hardened = match climber.climb(maze.clone(), config.limits) {
        Ok(hardened) => hardened,
        Err(HardeningError::NoImprovementFound { fitness }) => {
            debug!(restart = restart.index, fitness, "starting maze is a local optimum");
            HardenedMaze {
                maze,
                metric,
                baseline: fitness,
                fitness,
                iterations: 0,
                stop: StopReason::LocalOptimum,
            }
        }
        Err(HardeningError::Unsolvable) => {
            warn!(
                restart = restart.index,
                density = restart.density,
                "discarding unsolvable starting maze"
            );
            return Ok(None);
        }
        Err(error) => return Err(error),
    };

    Ok(Some(HardestMaze {
        hardened,
        density: restart.density,
        restart: restart.index,
    }))
}
