use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("airguard").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn category_command_prints_json() {
    let mut cmd = Command::cargo_bin("airguard").expect("binary exists");
    let output = cmd
        .env("AIRGUARD_DATA_DIR", tempfile::tempdir().unwrap().path())
        .args(["category", "--aqi", "42"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["category"]["level"], "Good");
    assert_eq!(doc["aqi"], 42);
}
