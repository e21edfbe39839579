use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use maze_fire_core::CellCoord;
use maze_fire_system_fire::{spread_fire, FireSpread};
use maze_fire_world::Maze;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn fire_never_extinguishes() {
    let mut maze = Maze::parse(
        "
        ..#.....
        ...#....
        .#...#..
        ....*...
        ..#.....
        ....##..
        .#......
        ........
        ",
    )
    .expect("valid layout");
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut fire = FireSpread::new(0.35).expect("valid flammability");

    let mut previous: Vec<CellCoord> = maze.burning_cells().collect();
    for _ in 0..30 {
        let ignited = fire.step(&mut maze, &mut rng);
        let current: Vec<CellCoord> = maze.burning_cells().collect();

        for cell in &previous {
            assert!(current.contains(cell), "{cell:?} stopped burning");
        }
        assert_eq!(current.len(), previous.len() + ignited);
        previous = current;
    }
}

#[test]
fn zero_flammability_never_spreads() {
    let mut maze = Maze::parse("...\n.*.\n...\n").expect("valid layout");
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    for _ in 0..10 {
        assert_eq!(spread_fire(&mut maze, 0.0, &mut rng), Ok(0));
    }
    assert_eq!(maze.burning_cells().count(), 1);
}

#[test]
fn obstacles_block_contagion() {
    let mut maze = Maze::parse(
        "
        ..#..
        ..#..
        *.#..
        ..#..
        ..#..
        ",
    )
    .expect("valid layout");
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    for _ in 0..20 {
        let _ = spread_fire(&mut maze, 1.0, &mut rng).expect("valid flammability");
    }

    for row in 0..5 {
        assert!(maze.is_on_fire(CellCoord::new(row, 0)));
        assert!(maze.is_on_fire(CellCoord::new(row, 1)));
        assert!(!maze.is_on_fire(CellCoord::new(row, 2)));
        assert!(!maze.is_on_fire(CellCoord::new(row, 3)));
        assert!(!maze.is_on_fire(CellCoord::new(row, 4)));
    }
}

#[test]
fn full_flammability_advances_one_ring_per_step() {
    let mut maze = Maze::parse(
        "
        .......
        .......
        .......
        ...*...
        .......
        .......
        .......
        ",
    )
    .expect("valid layout");
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let origin = CellCoord::new(3, 3);

    for step in 1..=3u32 {
        let _ = spread_fire(&mut maze, 1.0, &mut rng).expect("valid flammability");
        for (coord, cell) in maze.iter() {
            let within_reach = coord.manhattan_distance(origin) <= step;
            assert_eq!(cell.is_on_fire(), within_reach, "{coord:?} after step {step}");
        }
    }
}

#[test]
fn single_neighbor_ignites_at_the_flammability_rate() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut fire = FireSpread::new(0.3).expect("valid flammability");
    let trials = 4_000;
    let mut ignitions = 0;

    for _ in 0..trials {
        let mut maze = Maze::parse(".*#\n###\n#..\n").expect("valid layout");
        ignitions += fire.step(&mut maze, &mut rng);
    }

    let rate = ignitions as f64 / f64::from(trials);
    assert!((rate - 0.3).abs() < 0.04, "observed ignition rate {rate}");
}

#[test]
fn seeded_spread_replays_identically() {
    let first = replay(0x5eed);
    let second = replay(0x5eed);

    assert_eq!(first, second, "replay diverged between runs");
}

fn replay(seed: u64) -> u64 {
    let mut maze = Maze::parse(
        "
        ..........
        .##.......
        ..#...#...
        ......#...
        ...*......
        ..........
        .#####....
        ..........
        ....#.....
        ..........
        ",
    )
    .expect("valid layout");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut fire = FireSpread::new(0.2).expect("valid flammability");
    let mut hasher = DefaultHasher::new();

    for _ in 0..8 {
        fire.step(&mut maze, &mut rng).hash(&mut hasher);
        for cell in maze.burning_cells() {
            cell.hash(&mut hasher);
        }
    }
    hasher.finish()
}
