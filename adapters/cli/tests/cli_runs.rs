use std::process::{Command, Output};

fn maze_fire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-fire"))
        .args(args)
        .output()
        .expect("failed to launch the maze-fire binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8")
}

#[test]
fn solve_reports_every_algorithm_on_an_open_maze() {
    let output = maze_fire(&["solve", "--dimension", "6", "--density", "0", "--show"]);
    assert!(output.status.success(), "{output:?}");

    let text = stdout(&output);
    let rows: Vec<Vec<&str>> = text
        .lines()
        .skip(1)
        .take(5)
        .map(|line| line.split_whitespace().collect())
        .collect();
    let labels: Vec<&str> = rows.iter().map(|row| row[0]).collect();
    assert_eq!(
        labels,
        ["dfs", "bfs", "bidirectional", "astar-euclidean", "astar-manhattan"]
    );
    for row in &rows {
        assert_eq!(row[1], "10", "{row:?}");
    }

    let drawn: usize = text.lines().skip(6).map(|line| line.matches('o').count()).sum();
    assert_eq!(drawn, 11);
}

#[test]
fn escape_with_inert_fire_always_succeeds() {
    let output = maze_fire(&[
        "--seed",
        "4",
        "escape",
        "--dimension",
        "10",
        "--density",
        "0.1",
        "--flammability",
        "0",
        "--trials",
        "3",
    ]);
    assert!(output.status.success(), "{output:?}");

    let text = stdout(&output);
    for strategy in ["ignore", "avoid", "predict"] {
        assert!(
            text.lines().any(|line| line.starts_with(strategy) && line.ends_with("3/3")),
            "{strategy} missing from {text}"
        );
    }
}

#[test]
fn harden_runs_within_an_iteration_cap() {
    let output = maze_fire(&[
        "harden",
        "--dimension",
        "6",
        "--density",
        "0",
        "--max-iterations",
        "2",
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(!stdout(&output).is_empty());
}

#[test]
fn invalid_parameters_fail_cleanly() {
    let output = maze_fire(&["solve", "--density", "1.5"]);
    assert!(!output.status.success());

    let output = maze_fire(&["harden", "--sweep", "--densities", "0.2,2.0"]);
    assert!(!output.status.success());
}
