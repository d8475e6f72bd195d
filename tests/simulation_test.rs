use std::process::{Command, Output};

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_coffee_shop_sim"))
        .args(args)
        .env("RUST_LOG", "warn,coffee_shop_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_sim(&["--ticks", "100", "--seed", "1", "--quiet"]);

    // Check that the simulation exited successfully
    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);

    // Verify simulation complete message is present
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_sim(&["--ticks", "50", "--seed", "2", "--quiet"]);

    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);

    for line in [
        "Customers served:",
        "Customers lost:",
        "Commands applied:",
        "Commands rejected:",
        "Snapshots published:",
    ] {
        assert!(stderr.contains(line), "missing `{}` in stderr: {}", line, stderr);
    }
}

/// Test that the map is drawn unless --quiet is given
#[test]
fn test_map_drawn_without_quiet() {
    let output = run_sim(&["--ticks", "10", "--seed", "3"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Shop Floor ==="));
}

/// Test that scripted commands are applied and snapshots are streamed as JSON
#[test]
fn test_script_and_snapshot_stream() {
    let script = r#"[
        {"tick": 1, "command": {"kind": "PLACE_FURNITURE", "payload": {"type": "coffee_machine", "x": 2, "y": 3, "id": 1}}},
        {"tick": 2, "command": {"kind": "BREW_COFFEE", "payload": {"id": 1}}},
        {"tick": 3, "command": {"kind": "DELETE_FURNITURE", "payload": {"id": 99}}}
    ]"#;
    let path = std::env::temp_dir().join(format!("coffee_shop_script_{}.json", std::process::id()));
    std::fs::write(&path, script).expect("write script");

    let output = run_sim(&[
        "--ticks",
        "12",
        "--seed",
        "4",
        "--snapshots",
        "--script",
        path.to_str().expect("utf-8 temp path"),
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let snapshots: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("every stdout line is a snapshot"))
        .collect();
    assert_eq!(snapshots.len(), 2);

    let machine = &snapshots[0]["furniture"][0];
    assert_eq!(machine["type"], "coffee_machine");
    assert_eq!(machine["state"], "roasting");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Commands applied: 2"), "stderr: {}", stderr);
    assert!(stderr.contains("Commands rejected: 1"), "stderr: {}", stderr);
}

/// Test that a non-positive delta is refused
#[test]
fn test_invalid_delta_rejected() {
    let output = run_sim(&["--ticks", "5", "--delta", "0"]);
    assert!(!output.status.success());
}
