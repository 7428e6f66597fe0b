use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

const HEADER: &str = "ms,distance_mm,rain_pct,speed_kph,sign_event,gap_found,gap_width_mm,cabin_tc_x10,ambient_tc_x10,humid_pct,setpoint_x10";

// 50 rows, 10 ms apart: obstacle closes in from row 10.
fn write_scenario(dir: &TempDir) -> PathBuf {
    let mut csv = format!("{HEADER}\n");
    for i in 0..50u32 {
        let distance = if i < 10 { 5_000 } else { 800 };
        csv.push_str(&format!("{},{distance},0,30,0,0,0,220,220,40,0\n", i * 10));
    }
    let path = dir.path().join("scenario.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn write_config(dir: &TempDir, scenario: &Path) -> PathBuf {
    let toml = format!(
        r#"
[run]
max_ticks = 0
realtime = false
tail_ms = 0

[scenario]
path = "{}"

[vehicle]
ready = true
"#,
        scenario.display()
    );
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn ecu(cfg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ecu").unwrap();
    cmd.arg("--log-level").arg("error").arg("--config").arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["health"], 0, "ok", "stdout")]
#[case(&["run"], 0, "Run complete: 50 ticks (exhausted)", "stdout")]
#[case(&["run", "--max-ticks", "5"], 0, "5 ticks (max_ticks)", "stdout")]
#[case(&["self-check"], 0, "self-check ok: 50 scenario rows", "stdout")]
#[case(&["run", "--max-ticks", "x"], 2, "invalid value", "stderr")]
#[case(&["fly"], 2, "unrecognized subcommand", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(&dir);
    let cfg = write_config(&dir, &scenario);

    let mut cmd = ecu(&cfg);
    for a in args {
        cmd.arg(a);
    }
    let assert = cmd.assert().code(exit_code);

    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn json_run_summary_reports_autobrake_reaction() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(&dir);
    let cfg = write_config(&dir, &scenario);

    let out = ecu(&cfg)
        .arg("--json")
        .arg("run")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&out);
    let line = stdout
        .lines()
        .find(|l| l.contains("\"ticks\""))
        .unwrap_or_else(|| panic!("no summary line; stdout was: {stdout}"));
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["status"], "complete");
    assert_eq!(v["stop"], "exhausted");
    assert_eq!(v["ticks"], 50);
    // First close reading at 100 ms, brake on the third hit.
    assert_eq!(v["autobrake"]["reaction_ms"], 20);
    assert_eq!(v["autobrake"]["assertions"], 1);
    assert_eq!(v["final"]["brake"], true);
}

#[rstest]
fn outputs_flag_writes_trace_csv() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(&dir);
    let cfg = write_config(&dir, &scenario);
    let trace = dir.path().join("out.csv");

    ecu(&cfg)
        .arg("run")
        .arg("--outputs")
        .arg(&trace)
        .assert()
        .success();

    let text = fs::read_to_string(&trace).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("ms,brake,wiper_mode,alarm,limit_req,fan_stage,ac_on,blend,park_step")
    );
    assert_eq!(lines.count(), 50);
    assert!(text.contains("\n120,1,"), "brake should be on at 120 ms");
}

#[rstest]
#[case::missing_config(None, 3, "Invalid configuration")]
#[case::bad_rotation(Some("[run]\nmax_ticks = 5\n[logging]\nrotation = \"weekly\"\n"), 3, "rotation")]
#[case::unbounded_run(Some("[run]\nmax_ticks = 0\n"), 3, "needs a [scenario]")]
#[case::missing_scenario(Some("[scenario]\npath = \"missing.csv\"\n"), 4, "Could not load scenario")]
fn config_and_scenario_errors_map_to_exit_codes(
    #[case] body: Option<&str>,
    #[case] code: i32,
    #[case] needle: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    if let Some(text) = body {
        fs::write(&cfg, text).unwrap();
    }

    ecu(&cfg)
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .code(code)
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn run_without_scenario_is_bounded_by_max_ticks() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[run]\nmax_ticks = 5\n").unwrap();

    ecu(&cfg)
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run complete: 5 ticks (max_ticks)"));
}

#[rstest]
fn bad_scenario_header_is_reported_as_json() {
    let dir = tempdir().unwrap();
    let scenario = dir.path().join("bad.csv");
    fs::write(&scenario, "ms,distance\n0,100\n").unwrap();
    let cfg = write_config(&dir, &scenario);

    let out = ecu(&cfg)
        .arg("--json")
        .arg("run")
        .assert()
        .code(4)
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["reason"], "Scenario");
    assert_eq!(v["exit_code"], 4);
}
