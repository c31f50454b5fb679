//! 命令行端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("twinlink-cli").unwrap()
}

#[test]
fn test_target_table_output() {
    cli()
        .args(["target", "--time", "5", "--side", "left"])
        .assert()
        .success()
        .stdout(predicate::str::contains("x = -0.3500 m"))
        .stdout(predicate::str::contains("y = 0.9500 m"));
}

#[test]
fn test_target_json_output() {
    let output = cli()
        .args(["target", "--time", "10", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["side"], "right");
    assert_eq!(value["orbiting"], false);
    assert!((value["y"].as_f64().unwrap() - 1.2).abs() < 1e-12);
}

#[test]
fn test_target_rejects_negative_time() {
    cli()
        .args(["target", "--time=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("非负"));
}

#[test]
fn test_config_default_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("arm.toml");

    cli()
        .args(["config", "default", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(fs::read_to_string(&path).unwrap().contains("link_length"));

    cli()
        .args(["config", "check"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("配置有效"))
        .stdout(predicate::str::contains("残差门限: 关闭"));
}

#[test]
fn test_config_check_reports_invalid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "link_length = -0.5\n").unwrap();

    cli()
        .args(["config", "check"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("link_length"));
}

#[test]
fn test_simulate_short_run() {
    cli()
        .args(["simulate", "--duration", "1.5", "--side", "left"])
        .assert()
        .success()
        .stdout(predicate::str::contains("仿真结束"))
        .stdout(predicate::str::contains("1500 个控制周期"));
}

#[test]
fn test_simulate_missing_config() {
    cli()
        .args(["simulate", "--config", "/nonexistent/arm.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("加载配置失败"));
}
