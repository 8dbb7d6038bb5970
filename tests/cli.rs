//! End-to-end runs of the deterior binary.

use std::path::Path;
use std::process::{Command, Output};

const LOG: &str = "\
ID,State,Time
P-01,A,2020-01-01
P-01,A,2020-01-11
P-01,B,2020-01-21
P-02,A,2020-01-01
P-02,B,2020-01-11
P-02,C,2020-01-21
P-03,B,2020-01-01
P-03,B,2020-01-11
P-03,C,2020-01-21
";

fn deterior(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deterior"))
        .args(args)
        .output()
        .unwrap()
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn build_then_export() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("log.csv");
    let model = dir.path().join("model.json");
    std::fs::write(&data, LOG).unwrap();

    let out = deterior(&["build", path_str(&data), path_str(&model)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("S0: A"));
    assert!(stdout.contains("Parameters:"));
    assert!(model.exists());

    let out = deterior(&["matrix", path_str(&model)]);
    assert!(out.status.success());
    let csv = String::from_utf8(out.stdout).unwrap();
    assert!(csv.starts_with("Init State,S0,S1,S2\n"));

    let out = deterior(&["curve", path_str(&model), "--state", "1", "--stop", "3"]);
    assert!(out.status.success());
    let csv = String::from_utf8(out.stdout).unwrap();
    assert!(csv.starts_with("Time,S1,S2\n0,1,0\n"));

    let out = deterior(&["validate", path_str(&model), path_str(&data)]);
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().contains("Variance:"));
}

#[test]
fn unsupported_dataset_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("log.xls");
    std::fs::write(&data, LOG).unwrap();
    let model = dir.path().join("model.json");

    let out = deterior(&["build", path_str(&data), path_str(&model)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported dataset format"));
    assert!(!model.exists());
}

#[test]
fn corrupt_workbook_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("log.xlsx");
    std::fs::write(&data, LOG).unwrap();
    let model = dir.path().join("model.json");

    let out = deterior(&["build", path_str(&data), path_str(&model)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("workbook error"));
    assert!(!model.exists());
}

#[test]
fn format_file_renames_columns() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("log.csv");
    let format = dir.path().join("format.toml");
    let model = dir.path().join("model.json");
    std::fs::write(
        &data,
        "Asset,Grade,Date\nX,1,01/01/2020\nX,2,11/01/2020\n",
    )
    .unwrap();
    std::fs::write(
        &format,
        "[dataset]\nid_column = \"Asset\"\nstate_column = \"Grade\"\ntime_column = \"Date\"\ntime_format = \"%d/%m/%Y\"\n",
    )
    .unwrap();

    let out = deterior(&[
        "-f",
        path_str(&format),
        "build",
        path_str(&data),
        path_str(&model),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(model.exists());
}
