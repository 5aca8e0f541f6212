//! CLI command integration tests.
//! Each test clears BILAP_CONFIG so a developer's environment cannot leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bilap() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bilap").unwrap();
    cmd.env_remove("BILAP_CONFIG");
    cmd
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let output = bilap().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "bilap {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn spectrum_defaults() {
    let doc = run_json(&["spectrum", "--count", "5"]);
    assert_eq!(doc["kind"], "spectrum");
    assert_eq!(doc["params"]["points"], 100);
    assert_eq!(doc["params"]["primes"], serde_json::json!([2, 3]));

    let vals = doc["eigenvalues"].as_array().unwrap();
    assert_eq!(vals.len(), 5);
    assert!(vals[0].as_f64().unwrap().abs() < 1e-10);
    assert!(vals[1].as_f64().unwrap() > 0.0);
}

#[test]
fn flags_after_subcommand() {
    let doc = run_json(&["spectrum", "--points", "20", "--primes", "2,5", "--count", "3"]);
    assert_eq!(doc["params"]["points"], 20);
    assert_eq!(doc["params"]["primes"], serde_json::json!([2, 5]));
    assert_eq!(doc["params"]["weights"], serde_json::json!([1.0, 1.0]));
}

#[test]
fn decompose_closes_energy_split() {
    let doc = run_json(&["--points", "60", "decompose", "--modes", "4"]);
    let modes = doc["modes"].as_array().unwrap();
    assert_eq!(modes.len(), 4);
    for m in modes {
        assert!(m["residual"].as_f64().unwrap().abs() < 1e-10);
        assert_eq!(m["valuations"][0]["channel"], "p=2");
    }
}

#[test]
fn invariance_ground_row_is_zero() {
    let doc = run_json(&["--points", "50", "invariance", "--modes", "2"]);
    let ground = &doc["modes"][0]["deviations"];
    for d in ground.as_array().unwrap() {
        assert!(d["deviation"].as_f64().unwrap() < 1e-10);
    }
}

#[test]
fn eigenstate_samples() {
    let doc = run_json(&["--points", "16", "eigenstate", "1"]);
    assert_eq!(doc["mode"], 1);
    assert_eq!(doc["samples"].as_array().unwrap().len(), 16);
}

#[test]
fn eigenstate_out_of_range_fails() {
    bilap()
        .args(["--points", "16", "eigenstate", "16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn weight_mismatch_fails() {
    bilap()
        .args(["spectrum", "--primes", "2,3", "--weights", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must match"));
}

#[test]
fn config_file_and_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.toml");
    std::fs::write(
        &path,
        "points = 30\nhalf_period = 2.0\nprimes = [2, 3, 5]\nweights = [1.0, 0.5, 0.25]\n",
    )
    .unwrap();

    let doc = run_json(&["--config", path.to_str().unwrap(), "spectrum", "--count", "2"]);
    assert_eq!(doc["params"]["points"], 30);
    assert_eq!(doc["params"]["halfPeriod"], 2.0);
    assert_eq!(doc["params"]["weights"], serde_json::json!([1.0, 0.5, 0.25]));

    let doc = run_json(&["--config", path.to_str().unwrap(), "--points", "12", "spectrum"]);
    assert_eq!(doc["params"]["points"], 12);
    assert_eq!(doc["eigenvalues"].as_array().unwrap().len(), 12);
}

#[test]
fn config_from_environment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("env.toml");
    std::fs::write(&path, "points = 24\n").unwrap();

    let output = bilap()
        .env("BILAP_CONFIG", &path)
        .args(["spectrum", "--count", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["params"]["points"], 24);
}

#[test]
fn missing_config_fails() {
    bilap()
        .args(["--config", "/definitely/not/here.toml", "spectrum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn output_flag_writes_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.json");
    bilap()
        .args(["--points", "20", "spectrum", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["kind"], "spectrum");
}

#[test]
fn scaling_sweep() {
    let doc = run_json(&["scaling", "--sizes", "30,60"]);
    let points = doc["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1]["points"], 60);
    assert!(points[0]["lambda0"].as_f64().unwrap().abs() < 1e-9);
}

#[test]
fn prime_set_sweep() {
    let doc = run_json(&["--points", "40", "primes", "--set", "2", "--set", "2,3,5"]);
    let sets = doc["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[1]["energies"].as_array().unwrap().len(), 4);
    assert!(sets[1]["balance"]["coefficientOfVariation"].is_number());
}

#[test]
fn prime_set_defaults() {
    let doc = run_json(&["--points", "30", "primes"]);
    assert_eq!(doc["sets"].as_array().unwrap().len(), 3);
}

#[test]
fn composite_shift_warns() {
    bilap()
        .args(["--points", "20", "spectrum", "--primes", "2,4", "--count", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not prime"));
}

#[test]
fn weight_scan() {
    let doc = run_json(&["--points", "30", "weights", "--values", "0.5,2", "--count", "2"]);
    let runs = doc["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["eigenvalues"].as_array().unwrap().len(), 2);
}

#[test]
fn sweeps_warn_about_unused_inputs() {
    bilap()
        .args(["--points", "20", "--half-period", "2", "weights", "--values", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("weights ignores the configured half_period"));

    bilap()
        .args(["--points", "20", "--weights", "2,2", "primes", "--set", "2,3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("primes ignores the configured weights"));

    bilap()
        .args(["--points", "20", "scaling", "--sizes", "10"])
        .assert()
        .success()
        .stderr(predicate::str::contains("scaling ignores the configured points"));
}

#[test]
fn sweeps_quiet_on_defaults() {
    bilap()
        .args(["weights", "--values", "1", "--count", "1", "--points", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ignores").not());
}
