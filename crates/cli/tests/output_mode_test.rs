
use setup::*;

#[test]
fn test_json_mode_stdout_is_json_lines() {
    let dir = make_workspace();
    let mut cmd = make_cli();

    cmd.timeout(DEFAULT_TIMEOUT)
        .arg("-q")
        .arg("run")
        .arg("--config")
        .arg(dir.path().join("walkthrough.toml"))
        .arg("--json")
        .arg("--metrics");
    let output = cmd.output().expect("Failed to run command");
    assert!(output.status.success());

    let stdout_str = String::from_utf8(output.stdout).expect("Failed to read stdout");
    let lines: Vec<serde_json::Value> = stdout_str
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
        .collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0]["step"], "customers_schema");
    assert_eq!(lines[9]["step"], "joined_top_groups");

    let stderr_str = String::from_utf8(output.stderr).expect("Failed to read stderr");
    assert!(stderr_str.contains("walkthrough_step_duration_ms"));
}

#[test]
fn test_missing_source_exits_non_zero() {
    let dir = make_workspace();
    let mut cmd = make_cli();

    cmd.timeout(DEFAULT_TIMEOUT)
        .arg("-q")
        .arg("run")
        .arg("--config")
        .arg(dir.path().join("walkthrough.toml"))
        .arg("--orders")
        .arg(dir.path().join("nope.csv"))
        .arg("--json");
    let output = cmd.output().expect("Failed to run command");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
