use maze_fire_core::{CellCoord, HardnessMetric};
use maze_fire_system_generation::generate_maze;
use maze_fire_system_hardening::{
    find_hardest_maze, harden_maze, HardeningError, HardeningLimits, HardestMazeConfig,
    HillClimber, StopReason,
};
use maze_fire_world::Maze;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const METRICS: [HardnessMetric; 2] = [HardnessMetric::MaxFrontier, HardnessMetric::ExpandedCells];

fn solvable_maze(seed: u64, dimension: u32, density: f64) -> Maze {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut climber = HillClimber::new(HardnessMetric::ExpandedCells);
    loop {
        let maze = generate_maze(dimension, density, false, &mut rng).expect("valid config");
        if climber.fitness(&maze).is_some() {
            return maze;
        }
    }
}

#[test]
fn hardening_never_lowers_fitness_and_keeps_the_maze_solvable() {
    let mut climbed = 0;
    for metric in METRICS {
        for seed in 0..4 {
            let maze = solvable_maze(seed, 7, 0.2);
            let limits = HardeningLimits::unbounded().with_max_iterations(6);

            let report = match harden_maze(maze, metric, limits) {
                Ok(report) => report,
                Err(HardeningError::NoImprovementFound { .. }) => continue,
                Err(error) => panic!("unexpected failure: {error}"),
            };
            climbed += 1;

            assert!(report.fitness() > report.baseline(), "{metric:?}");
            assert!(report.iterations() >= 1 && report.iterations() <= 6);

            let mut climber = HillClimber::new(metric);
            assert_eq!(climber.fitness(report.maze()), Some(report.fitness()));
            assert!(!report.maze().is_blocked(report.maze().start()));
            assert!(!report.maze().is_blocked(report.maze().goal()));
        }
    }
    assert!(climbed > 0, "no starting maze could be hardened");
}

#[test]
fn equally_good_flips_resolve_to_the_first_in_row_major_order() {
    let maze = Maze::parse(
        "
        ...
        ##.
        ##.
        ",
    )
    .expect("valid layout");
    let limits = HardeningLimits::unbounded().with_max_iterations(1);

    let report = harden_maze(maze.clone(), HardnessMetric::MaxFrontier, limits)
        .expect("improving flips exist");

    let mut expected = maze.clone();
    assert!(expected.toggle_blocked(CellCoord::new(1, 0)));
    assert_eq!(report.baseline(), 1);
    assert_eq!(report.fitness(), 2);
    assert_eq!(report.maze(), &expected);

    let mut later = maze;
    assert!(later.toggle_blocked(CellCoord::new(1, 1)));
    assert_eq!(HillClimber::new(HardnessMetric::MaxFrontier).fitness(&later), Some(2));
}

/// Exhaustive single-flip scan: the highest fitness above the starting one,
/// and every flip reaching it in row-major order.
fn best_flips(maze: &Maze, metric: HardnessMetric) -> Option<(usize, Vec<CellCoord>)> {
    let mut climber = HillClimber::new(metric);
    let current = climber.fitness(maze)?;
    let mut scored = Vec::new();
    for index in 0..maze.cell_count() {
        let cell = maze.coord(index).expect("index in bounds");
        let mut flipped = maze.clone();
        if !flipped.toggle_blocked(cell) {
            continue;
        }
        if let Some(fitness) = climber.fitness(&flipped) {
            scored.push((cell, fitness));
        }
    }

    let best = scored.iter().map(|(_, fitness)| *fitness).max()?;
    (best > current).then(|| {
        let cells = scored
            .iter()
            .filter(|(_, fitness)| *fitness == best)
            .map(|(cell, _)| *cell)
            .collect();
        (best, cells)
    })
}

#[test]
fn each_step_adopts_the_first_of_the_best_flips() {
    for metric in METRICS {
        for seed in 0..12 {
            let maze = solvable_maze(100 + seed, 6, 0.25);
            let limits = HardeningLimits::unbounded().with_max_iterations(1);

            match (best_flips(&maze, metric), harden_maze(maze.clone(), metric, limits)) {
                (Some((best, cells)), Ok(report)) => {
                    let mut expected = maze.clone();
                    assert!(expected.toggle_blocked(cells[0]));
                    assert_eq!(report.fitness(), best, "{metric:?} seed {seed}");
                    assert_eq!(report.maze(), &expected, "{metric:?} seed {seed}");
                }
                (None, Err(HardeningError::NoImprovementFound { .. })) => {}
                (expected, outcome) => {
                    panic!("{metric:?} seed {seed}: scan {expected:?} vs climb {outcome:?}")
                }
            }
        }
    }
}

#[test]
fn unbounded_climb_ends_at_a_local_optimum() {
    let maze = solvable_maze(12, 6, 0.25);
    let report = match harden_maze(maze, HardnessMetric::MaxFrontier, HardeningLimits::unbounded())
    {
        Ok(report) => report,
        Err(HardeningError::NoImprovementFound { .. }) => return,
        Err(error) => panic!("unexpected failure: {error}"),
    };
    assert_eq!(report.stop_reason(), StopReason::LocalOptimum);

    let mut climber = HillClimber::new(HardnessMetric::MaxFrontier);
    let mut flipped = report.maze().clone();
    for index in 0..flipped.cell_count() {
        let cell = flipped.coord(index).expect("index in bounds");
        if !flipped.toggle_blocked(cell) {
            continue;
        }
        if let Some(fitness) = climber.fitness(&flipped) {
            assert!(fitness <= report.fitness(), "flipping {cell:?} still improves");
        }
        let _ = flipped.toggle_blocked(cell);
    }
}

#[test]
fn unsolvable_start_is_rejected() {
    let maze = Maze::parse(
        "
        ..#
        .#.
        #..
        ",
    )
    .expect("valid layout");

    for metric in METRICS {
        assert_eq!(
            harden_maze(maze.clone(), metric, HardeningLimits::default()),
            Err(HardeningError::Unsolvable)
        );
    }
}

#[test]
fn a_maze_without_improving_flips_reports_no_improvement() {
    let maze = Maze::open(2).expect("valid dimension");

    assert_eq!(
        harden_maze(maze, HardnessMetric::MaxFrontier, HardeningLimits::default()),
        Err(HardeningError::NoImprovementFound { fitness: 2 })
    );

    let single = Maze::open(1).expect("valid dimension");
    assert_eq!(
        harden_maze(single, HardnessMetric::ExpandedCells, HardeningLimits::default()),
        Err(HardeningError::NoImprovementFound { fitness: 1 })
    );
}

#[test]
fn zero_iteration_limit_returns_the_starting_maze() {
    let maze = solvable_maze(3, 6, 0.2);
    let limits = HardeningLimits::unbounded().with_max_iterations(0);

    let report = harden_maze(maze.clone(), HardnessMetric::ExpandedCells, limits)
        .expect("solvable start");

    assert_eq!(report.stop_reason(), StopReason::IterationLimit);
    assert_eq!(report.iterations(), 0);
    assert_eq!(report.fitness(), report.baseline());
    assert_eq!(report.maze(), &maze);
}

#[test]
fn hardest_maze_search_replays_deterministically() {
    let config = HardestMazeConfig {
        dimension: 6,
        densities: vec![0.1, 0.3],
        restarts_per_density: 3,
        seed: 99,
        limits: HardeningLimits::unbounded().with_max_iterations(4),
    };

    let first = find_hardest_maze(&config, HardnessMetric::MaxFrontier).expect("solvable start");
    let second = find_hardest_maze(&config, HardnessMetric::MaxFrontier).expect("solvable start");

    assert_eq!(first, second);
    assert!(config.densities.contains(&first.density));
    assert!(first.restart < 6);
    assert!(first.hardened.fitness() >= first.hardened.baseline());
}

#[test]
fn hardest_maze_search_validates_its_configuration() {
    let bad_density = HardestMazeConfig {
        densities: vec![0.2, 1.5],
        ..HardestMazeConfig::default()
    };
    assert!(matches!(
        find_hardest_maze(&bad_density, HardnessMetric::ExpandedCells),
        Err(HardeningError::Maze(_))
    ));

    let sealed = HardestMazeConfig {
        dimension: 5,
        densities: vec![1.0],
        restarts_per_density: 2,
        ..HardestMazeConfig::default()
    };
    assert_eq!(
        find_hardest_maze(&sealed, HardnessMetric::ExpandedCells),
        Err(HardeningError::NoSolvableStart { attempts: 2 })
    );
}
