mod common;

use assert_cmd::Command;
use common::*;
use finance_screening::data::CellValue;
use finance_screening::io_utils::read_table_from_path;
use predicates::prelude::*;
use predicates::str::contains;

fn bin() -> Command {
    Command::cargo_bin("finance-screening").expect("binary exists")
}

#[test]
fn health_prints_ok_status() {
    bin()
        .arg("health")
        .assert()
        .success()
        .stdout(contains(r#"{"status":"ok"}"#));
}

#[test]
fn preview_prints_json_with_stats() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_workbook("sales.xlsx", &sample_table());
    let output = bin()
        .args(["preview", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let body: serde_json::Value = serde_json::from_slice(&output).expect("json body");
    assert_eq!(body["stats"]["duplicate_tank_groups"], 1);
    assert_eq!(body["rows"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["issues"], serde_json::json!([]));
}

#[test]
fn preview_table_renders_limited_rows() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_workbook("sales.xlsx", &sample_table());
    bin()
        .args([
            "preview",
            "-i",
            input.to_str().unwrap(),
            "--table",
            "--rows",
            "1",
            "--duplicate-mode",
            "group",
        ])
        .assert()
        .success()
        .stdout(contains("TANK::ABC123"))
        .stdout(contains("XYZ999").not());
}

#[test]
fn transform_writes_grouped_workbook_from_config_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_workbook("sales.xlsx", &sample_table());
    let config = workspace.write("options.yaml", b"duplicate_mode: group\n");
    let output = workspace.path().join("out.xlsx");
    bin()
        .args([
            "transform",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--config-file",
            config.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = read_table_from_path(&output).expect("read output");
    assert_eq!(written.len(), 2);
    assert_eq!(cell(&written, 0, TAX), &CellValue::Number(350.0));
}

#[test]
fn transform_fails_and_lists_missing_columns() {
    let workspace = TestWorkspace::new();
    let mut table = sample_table();
    table.drop_column(TAX);
    let input = workspace.write_workbook("sales.xlsx", &table);
    let output = workspace.path().join("out.xlsx");
    bin()
        .args([
            "transform",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Missing required columns: ภาษี"));
    assert!(!output.exists());
}

#[test]
fn malformed_config_payload_is_rejected() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_workbook("sales.xlsx", &sample_table());
    bin()
        .args([
            "preview",
            "-i",
            input.to_str().unwrap(),
            "--config",
            "{\"duplicate_mode\": \"merge\"}",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid config payload"));
}

#[test]
fn non_spreadsheet_inputs_are_rejected() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", b"a,b\n1,2\n");
    bin()
        .args(["preview", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Unsupported file type"));
}
