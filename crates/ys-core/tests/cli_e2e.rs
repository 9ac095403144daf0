//! End-to-end tests for the ys-core binary.
//!
//! Every invocation runs with logging off and an isolated config
//! environment, so stdout carries the command payload and stderr only the
//! structured error.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "event_id": [1, 2, 3],
  "date": ["2000-03-01", "2000-09-12", "2001-05-05"],
  "frequency": [0.2, 0.3, 0.5],
  "imp_mat": {
    "n_rows": 3,
    "n_cols": 2,
    "rows": [0, 1, 2, 2],
    "cols": [0, 1, 0, 1],
    "values": [1.0, 2.0, 4.0, 4.0]
  },
  "tag": {"description": "demo"}
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Workspace {
            dir: tempfile::tempdir().unwrap(),
        };
        ws.write("catalog.json", CATALOG);
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// ys-core with logging silenced and no config leaking in from the host.
    fn ys_core(&self) -> Command {
        let mut cmd = Command::cargo_bin("ys-core").expect("ys-core binary should exist");
        cmd.env_remove("YEARSET_CONFIG")
            .env_remove("YEARSET_CONFIG_DIR")
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .args(["--log-level", "off"]);
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn stderr_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stderr).expect("stderr should be a structured error")
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let ws = Workspace::new();
    ws.ys_core()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("aggregate"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn unknown_command_fails() {
    let ws = Workspace::new();
    ws.ys_core()
        .arg("nonexistent-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// build / replay
// ============================================================================

#[test]
fn build_emits_yearset_and_plan() {
    let ws = Workspace::new();
    let plan_path = ws.path("plan.json");
    let output = ws
        .ys_core()
        .args(["build", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--years", "2000-2004", "--seed", "7"])
        .args(["--plan-out", arg(&plan_path)])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["yearset"]["event_id"], serde_json::json!([1, 2, 3, 4, 5]));
    assert_eq!(json["yearset"]["date"][0], "2000-01-01");
    assert_eq!(json["yearset"]["tag"]["yearset"], true);
    // total frequency is exactly 1: one event per year
    assert_eq!(json["lambda"], 1.0);
    let plan = json["plan"].as_array().unwrap();
    assert_eq!(plan.len(), 5);
    assert!(plan.iter().all(|entry| entry.as_array().unwrap().len() == 1));
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&plan_path).unwrap()).unwrap();
    assert_eq!(saved, json["plan"]);
}

#[test]
fn build_is_reproducible_with_seed() {
    let ws = Workspace::new();
    let n = 20;
    let catalog = serde_json::json!({
        "event_id": (1..=n).collect::<Vec<u64>>(),
        "date": vec!["1999-07-01"; n as usize],
        "frequency": vec![0.05; n as usize],
        "at_event": (1..=n).map(|i| i as f64).collect::<Vec<f64>>(),
    });
    let catalog = ws.write("large.json", &catalog.to_string());
    let run = || {
        let output = ws
            .ys_core()
            .args(["build", "--catalog", arg(&catalog)])
            .args(["--years", "1990-2019", "--lambda", "1.5", "--seed", "42"])
            .output()
            .unwrap();
        assert!(output.status.success());
        stdout_json(&output)
    };
    let (a, b) = (run(), run());
    assert_eq!(a["plan"], b["plan"]);
    assert_eq!(a["yearset"], b["yearset"]);
    assert_ne!(a["run_id"], b["run_id"]);
}

#[test]
fn replay_reproduces_build() {
    let ws = Workspace::new();
    let plan_path = ws.path("plan.json");
    let built = ws
        .ys_core()
        .args(["build", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--years", "2010-2013", "--seed", "3", "--no-correction"])
        .args(["--plan-out", arg(&plan_path)])
        .output()
        .unwrap();
    assert!(built.status.success());

    let replayed = ws
        .ys_core()
        .args(["replay", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--plan", arg(&plan_path), "--years", "2010-2013", "--no-correction"])
        .output()
        .unwrap();
    assert!(replayed.status.success());

    let built = stdout_json(&built);
    let replayed = stdout_json(&replayed);
    assert_eq!(built["yearset"], replayed["yearset"]);
    assert_eq!(built["fingerprint"], replayed["fingerprint"]);
}

#[test]
fn replay_with_wrong_year_count_is_shape_error() {
    let ws = Workspace::new();
    let plan = ws.write("plan.json", "[[0], [1, 2]]");
    let output = ws
        .ys_core()
        .args(["replay", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--plan", arg(&plan), "--years", "2000"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(12));
    let err = stderr_json(&output);
    assert_eq!(err["code"], 31);
    assert_eq!(err["category"], "shape");
    assert_eq!(err["context"]["plan"], 2);
}

#[test]
fn capacity_error_exit_code() {
    let ws = Workspace::new();
    let output = ws
        .ys_core()
        .args(["build", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--years", "2000-2009", "--lambda", "60", "--seed", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(11));
    let err = stderr_json(&output);
    assert_eq!(err["code"], 20);
    assert_eq!(err["context"]["available"], 3);
}

#[test]
fn bad_year_list_is_args_error() {
    let ws = Workspace::new();
    ws.ys_core()
        .args(["build", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--years", "2005-2001"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("\"code\":10"));
}

#[test]
fn missing_catalog_is_io_error() {
    let ws = Workspace::new();
    ws.ys_core()
        .args(["build", "--catalog", arg(&ws.path("absent.json"))])
        .args(["--years", "2000"])
        .assert()
        .code(20)
        .stderr(predicate::str::contains("\"code\":60"));
}

#[test]
fn summary_format_is_one_line() {
    let ws = Workspace::new();
    ws.ys_core()
        .args(["--format", "summary", "build"])
        .args(["--catalog", arg(&ws.path("catalog.json"))])
        .args(["--years", "2000-2002", "--seed", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build: 3 years, 3 events"));
}

// ============================================================================
// aggregate / extract
// ============================================================================

#[test]
fn aggregate_groups_by_calendar_year() {
    let ws = Workspace::new();
    let output = ws
        .ys_core()
        .args(["aggregate", "--catalog", arg(&ws.path("catalog.json"))])
        .output()
        .unwrap();
    assert!(output.status.success());

    let yearly = &stdout_json(&output)["yearset"];
    assert_eq!(yearly["date"], serde_json::json!(["2000-01-01", "2001-01-01"]));
    assert_eq!(yearly["at_event"], serde_json::json!([3.0, 8.0]));
    assert_eq!(yearly["frequency"], serde_json::json!([1.0, 1.0]));
}

#[test]
fn aggregate_without_matrix_fails() {
    let ws = Workspace::new();
    let catalog = ws.write(
        "flat.json",
        r#"{"event_id":[1],"date":["2000-01-01"],"frequency":[1.0],"at_event":[5.0]}"#,
    );
    let output = ws
        .ys_core()
        .args(["aggregate", "--catalog", arg(&catalog)])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(12));
    assert_eq!(stderr_json(&output)["code"], 30);
}

#[test]
fn extract_redates_events() {
    let ws = Workspace::new();
    let plan = ws.write("plan.json", "[[2], [0, 1]]");
    let output = ws
        .ys_core()
        .args(["extract", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--plan", arg(&plan), "--years", "2050,2051"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events = &stdout_json(&output)["events"];
    assert_eq!(
        events["date"],
        serde_json::json!(["2050-05-05", "2051-03-01", "2051-09-12"])
    );
    assert_eq!(events["at_event"], serde_json::json!([8.0, 1.0, 2.0]));
    assert_eq!(events["tag"]["description"], "demo");
}

#[test]
fn extract_out_of_range_index_fails() {
    let ws = Workspace::new();
    let plan = ws.write("plan.json", "[[7]]");
    let output = ws
        .ys_core()
        .args(["extract", "--catalog", arg(&ws.path("catalog.json"))])
        .args(["--plan", arg(&plan), "--years", "2000"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(12));
    assert_eq!(stderr_json(&output)["code"], 33);
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_show_defaults() {
    let ws = Workspace::new();
    let output = ws.ys_core().args(["config", "show"]).output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["source"]["using_defaults"], true);
    assert_eq!(json["values"]["apply_correction"], true);
}

#[test]
fn config_file_is_applied() {
    let ws = Workspace::new();
    let config = ws.write("yearset.json", r#"{"lambda": 0.0, "apply_correction": false}"#);
    let output = ws
        .ys_core()
        .args(["--config", arg(&config), "build"])
        .args(["--catalog", arg(&ws.path("catalog.json"))])
        .args(["--years", "2000-2002"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["lambda"], 0.0);
    assert_eq!(json["apply_correction"], false);
    assert_eq!(json["yearset"]["at_event"], serde_json::json!([0.0, 0.0, 0.0]));
}

#[test]
fn config_dir_env_is_resolved() {
    let ws = Workspace::new();
    std::fs::create_dir(ws.path("conf")).unwrap();
    ws.write("conf/yearset.json", r#"{"seed": 11}"#);
    let output = ws
        .ys_core()
        .env("YEARSET_CONFIG_DIR", ws.path("conf"))
        .args(["config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["values"]["seed"], 11);
    assert_eq!(json["source"]["kind"], "environment variable");
}

#[test]
fn invalid_config_is_rejected() {
    let ws = Workspace::new();
    let config = ws.write("yearset.json", r#"{"lambda": -2.0}"#);
    let output = ws
        .ys_core()
        .args(["--config", arg(&config), "config", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    assert_eq!(stderr_json(&output)["code"], 11);
}
