use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use lsim_tensor::{digest, load, save, Tensor};

fn lsim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lsim"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn tensor_info_reports_shape_and_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kernel.f64");
    let tensor = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    save(&tensor, &path).unwrap();

    let output = lsim(&["tensor", "info", &path_arg(&path), "--json"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["shape"], serde_json::json!([2, 3]));
    assert_eq!(report["rank"], 2);
    assert_eq!(report["element_count"], 6);
    assert_eq!(report["sha256"], digest(&tensor).unwrap());
}

#[test]
fn tensor_convert_binary_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("corr.f64");
    let target = dir.path().join("corr.txt");
    let tensor = Tensor::new(vec![2, 2], vec![0.5, -1.25, f64::MAX, 0.0]).unwrap();
    save(&tensor, &source).unwrap();

    let output = lsim(&["tensor", "convert", &path_arg(&source), &path_arg(&target)]);
    assert!(output.status.success());
    assert!(load(&target).unwrap().bitwise_eq(&tensor));
}

#[test]
fn tensor_info_on_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = lsim(&["tensor", "info", &path_arg(&dir.path().join("none.f64"))]);
    assert!(!output.status.success());
}

#[test]
fn params_prints_effective_entries() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("parameter.txt");
    fs::write(&file, "# comment\nmode 5\nt_max 60\nmode 9\n").unwrap();

    let output = lsim(&["params", &path_arg(&file), "-Pmode=7"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "mode\t7\nt_max\t60\n");

    let output = lsim(&["params", "--no-overrides", &path_arg(&file), "-Pmode=7"]);
    assert_eq!(stdout(&output), "mode\t5\nt_max\t60\n");
}

#[test]
fn params_options_after_the_file_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("parameter.txt");
    fs::write(&file, "mode 5\n").unwrap();

    let output = lsim(&["params", &path_arg(&file), "-Pmode=1", "--json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--json"));

    let output = lsim(&["params", "--json", &path_arg(&file), "-Pmode=1"]);
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(entries[0]["name"], "mode");
    assert_eq!(entries[0]["value"], "1");
}

#[test]
fn params_export_writes_provenance_header() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("parameter.txt");
    let exported = dir.path().join("used.txt");
    fs::write(&file, "num_obs 2\n").unwrap();

    let output = lsim(&[
        "params",
        "--export",
        &path_arg(&exported),
        &path_arg(&file),
    ]);
    assert!(output.status.success());
    let text = fs::read_to_string(&exported).unwrap();
    assert!(text.starts_with("# File generated on UTC "));
    assert!(text.contains("num_obs 2"));
}

#[test]
fn config_write_applies_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("cfg").join("parameter.txt");
    let output = lsim(&[
        "config",
        "write",
        "--set",
        "num_sim=3",
        "--set",
        "t_min=20",
        "--out",
        &path_arg(&target),
    ]);
    assert!(output.status.success());
    let text = fs::read_to_string(&target).unwrap();
    assert!(text.contains("num_sim 3\n"));
    assert!(text.contains("t_min 20.0\n"));
}

#[test]
fn config_write_merges_yaml_run_file() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = dir.path().join("run.yaml");
    fs::write(&yaml, "stationary: true\nnum_obs: 3\n").unwrap();

    let output = lsim(&["config", "show", "--from", &path_arg(&yaml), "--set", "num_obs=4"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("stationary true\n"));
    assert!(text.contains("num_obs 4\n"));
}

#[test]
fn config_rejects_ambiguous_booleans() {
    let output = lsim(&["config", "show", "--set", "shift=yes"]);
    assert!(!output.status.success());
}

#[test]
fn inputs_lists_selected_trajectories() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["t_1.txt", "t_2.txt", "t_30.txt"] {
        fs::write(dir.path().join(name), "").unwrap();
    }
    let output = lsim(&[
        "inputs",
        "--set",
        &format!("in_folder={}", dir.path().display()),
        "--set",
        "in_prefix=t_",
        "--set",
        "file_range=0-9",
    ]);
    assert!(output.status.success());
    let listed: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(
        listed,
        [
            path_arg(&dir.path().join("t_1.txt")),
            path_arg(&dir.path().join("t_2.txt")),
        ]
    );
}

#[cfg(unix)]
#[test]
fn run_drives_stages_and_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let out_set = format!("out_folder={}", out.display());

    let output = lsim(&[
        "run", "--quiet", "--set", &out_set, "--set", "corr_exe=true", "--set",
        "kernel_exe=true",
    ]);
    assert!(output.status.success());
    assert!(out.join("parameter.txt").is_file());
    assert!(out.join("corr_log.txt").is_file());
    assert!(out.join("kernel_log.txt").is_file());
    assert!(!out.join("sim_log.txt").exists());

    let output = lsim(&[
        "run", "--quiet", "--continue-on-error", "--set", &out_set, "--set",
        "corr_exe=false", "--set", "kernel_exe=true",
    ]);
    assert_eq!(output.status.code(), Some(1));
}
