use maze_fire_core::MazeError;
use maze_fire_system_generation::{generate_maze, GenerationConfig, MazeGenerator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn endpoints_are_open_at_every_density() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for step in 0..=10 {
        let density = f64::from(step) / 10.0;
        for _ in 0..20 {
            let maze = generate_maze(12, density, false, &mut rng).expect("valid config");
            assert!(!maze.is_blocked(maze.start()));
            assert!(!maze.is_blocked(maze.goal()));
            assert_eq!(maze.burning_cells().count(), 0);
        }
    }
}

#[test]
fn fire_starts_in_exactly_one_open_non_start_cell() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for _ in 0..200 {
        let maze = generate_maze(6, 0.3, true, &mut rng).expect("valid config");
        let burning: Vec<_> = maze.burning_cells().collect();

        assert_eq!(burning.len(), 1, "expected a single fire origin");
        assert_ne!(burning[0], maze.start());
        assert!(!maze.is_blocked(burning[0]));
    }
}

#[test]
fn density_extremes_produce_open_and_full_mazes() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let open = generate_maze(8, 0.0, false, &mut rng).expect("valid config");
    assert_eq!(open.open_cells().count(), 64);

    let full = generate_maze(8, 1.0, false, &mut rng).expect("valid config");
    assert_eq!(full.open_cells().count(), 2);
}

#[test]
fn fire_on_a_full_maze_lands_on_the_goal() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let maze = generate_maze(5, 1.0, true, &mut rng).expect("valid config");

    assert_eq!(maze.initial_fire(), Some(maze.goal()));
}

#[test]
fn observed_density_tracks_configuration() {
    let mut rng = ChaCha8Rng::seed_from_u64(19);
    let maze = generate_maze(100, 0.3, false, &mut rng).expect("valid config");

    let blocked = maze.cell_count() - maze.open_cells().count();
    let ratio = blocked as f64 / maze.cell_count() as f64;
    assert!((ratio - 0.3).abs() < 0.03, "observed density {ratio}");
}

#[test]
fn same_seed_reproduces_the_same_maze() {
    let generator = MazeGenerator::new(GenerationConfig {
        dimension: 20,
        density: 0.25,
        with_fire: true,
    })
    .expect("valid config");

    let first = generator
        .generate(&mut ChaCha8Rng::seed_from_u64(42))
        .expect("maze");
    let second = generator
        .generate(&mut ChaCha8Rng::seed_from_u64(42))
        .expect("maze");
    assert_eq!(first, second);
}

#[test]
fn invalid_configurations_are_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    assert_eq!(
        generate_maze(0, 0.2, false, &mut rng),
        Err(MazeError::ZeroDimension)
    );
    assert_eq!(
        generate_maze(4, -0.1, false, &mut rng),
        Err(MazeError::ProbabilityOutOfRange {
            name: "density",
            value: -0.1,
        })
    );
    assert_eq!(
        generate_maze(1, 0.0, true, &mut rng),
        Err(MazeError::NoIgnitionSite { dimension: 1 })
    );
}
