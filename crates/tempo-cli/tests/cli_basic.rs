//! Basic CLI E2E tests.
//!
//! Tests invoke the built `tempo` binary against a throwaway config
//! directory and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command with `TEMPO_HOME` pointed at `home`.
fn run_cli(home: &Path, args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tempo"))
        .args(args)
        .env("TEMPO_HOME", home)
        .env_remove("TEMPO_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("CLI did not exit");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("stdout line is JSON"))
        .collect()
}

fn fast_home() -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "[timer]\ntick_ms = 2\n\n[notifications]\nchime = false\n",
    )
    .unwrap();
    home
}

#[test]
fn test_presets_json() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["presets", "--json"], None);
    assert_eq!(code, 0, "presets failed");

    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[3]["duration_min"], 25);
    assert_eq!(rows[3]["energy_cost"], 50);
    assert_eq!(rows[4]["mode"], "sprint");
    assert!(rows.iter().all(|r| r["selectable"] == true));
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "energy.starting", "20"], None);
    assert_eq!(code, 0, "config set failed");

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "energy.starting"], None);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "20");

    let (code, stdout, _) = run_cli(home.path(), &["presets", "--json"], None);
    assert_eq!(code, 0);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows[0]["selectable"], true);
    assert_eq!(rows[1]["selectable"], false);
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "timer.nope", "1"], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_rejects_flex_minutes_outside_slider() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        home.path(),
        &["config", "set", "timer.flex_minutes", "500"],
        None,
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("timer.flex_minutes"));
    assert!(!home.path().join("config.toml").exists());
}

#[test]
fn test_run_reports_invalid_config_file() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "[timer]\nflex_minutes = 500\n",
    )
    .unwrap();

    let (code, stdout, stderr) = run_cli(home.path(), &["run", "flex"], None);
    assert_ne!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("timer.flex_minutes"));
}

#[test]
fn test_run_flex_to_completion() {
    let home = fast_home();
    let (code, stdout, stderr) =
        run_cli(home.path(), &["run", "flex", "--minutes", "1", "--json"], None);
    assert_eq!(code, 0, "run failed: {stderr}");

    let snapshots = json_lines(&stdout);
    let first = snapshots.first().unwrap();
    assert_eq!(first["state"], "running");
    assert_eq!(first["total_secs"], 60);
    assert_eq!(first["display"], "1:00");

    let last = snapshots.last().unwrap();
    assert_eq!(last["state"], "idle");
    assert_eq!(last["remaining_secs"], 0);
    assert_eq!(last["session_count"], 1);

    assert!(stderr.contains("Timer Complete!"));
    assert!(stderr.contains("Break ideas:"));
}

#[test]
fn test_run_rejects_unaffordable_preset() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("config.toml"), "[energy]\nstarting = 10\n").unwrap();

    let (code, _, stderr) = run_cli(home.path(), &["run", "momentum", "--preset", "1"], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("not enough energy"));
}

#[test]
fn test_run_rejects_bad_mode() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["run", "marathon"], None);
    assert_ne!(code, 0);
}

#[test]
fn test_session_commands() {
    let home = tempfile::tempdir().unwrap();
    let script = "sprint 1\npause\nstatus\nmomentum 4\nstop\nbogus\nquit\n";
    let (code, stdout, stderr) = run_cli(home.path(), &["session"], Some(script));
    assert_eq!(code, 0, "session failed: {stderr}");

    let snapshots = json_lines(&stdout);
    assert_eq!(snapshots.len(), 5);
    assert_eq!(snapshots[0]["state"], "running");
    assert_eq!(snapshots[0]["mode"], "sprint");
    assert_eq!(snapshots[1]["state"], "paused");
    assert_eq!(snapshots[2]["state"], "paused");

    // Starting from paused begins the new preset.
    assert_eq!(snapshots[3]["state"], "running");
    assert_eq!(snapshots[3]["total_secs"], 1500);
    assert_eq!(snapshots[3]["energy"], 50);

    assert_eq!(snapshots[4]["state"], "idle");
    assert_eq!(snapshots[4]["display"], "--:--");
    assert!(stderr.contains("unknown command 'bogus'"));
}

#[test]
fn test_session_ends_on_eof() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["session"], Some("status\n"));
    assert_eq!(code, 0);
    let snapshots = json_lines(&stdout);
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0]["state"], "idle");
    assert_eq!(snapshots[0]["energy"], 100);
}
