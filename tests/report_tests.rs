// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report export and table rendering over real runner output

use pump_attack::attack::ValidationExecutor;
use pump_attack::config::RunSettings;
use pump_attack::corpus::Corpus;
use pump_attack::engine::BacktrackEngine;
use pump_attack::report::{self, ReportFormatter, ReportOutputFormat};
use pump_attack::types::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sample_profile() -> ProfileReport {
    let engine = BacktrackEngine::new();
    let corpus = Corpus::from_records(
        "sample",
        vec![
            VulnerabilityRecord::new("70", "^([A-Za-z]|[A-Za-z][0-9]*|[0-9]*[A-Za-z])+$", "A", "A", "!", 5),
            VulnerabilityRecord::new("67", "", "", "<tag", "", 0)
                .skipped("skipped - python hangs")
                .with_notes("skipped - python hangs"),
            VulnerabilityRecord::new("bad", "(unclosed", "", "a", "", 1),
        ],
    );
    let executor = ValidationExecutor::new(&engine, RunSettings::default());
    executor.profile(&corpus)
}

#[test]
fn json_export_carries_every_row() {
    let dir = TempDir::new().expect("tempdir should create");
    let path = dir.path().join("out/report.json");
    let full = report::assemble("regress", 5_000, vec![sample_profile()], Vec::new());

    report::save_report(&full, &path, ReportOutputFormat::Json).expect("report should save");

    let content = fs::read_to_string(&path).expect("report should exist");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["engine"], "regress");
    let rows = value["profiles"][0]["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["verdict"]["verdict"], "measured");
    assert_eq!(rows[1]["verdict"]["verdict"], "skipped");
    assert_eq!(rows[2]["verdict"]["verdict"], "compile_failed");
    assert!(value.get("stress").is_none());
}

#[test]
fn yaml_export_round_trips_through_serde() {
    let dir = TempDir::new().expect("tempdir should create");
    let path = dir.path().join("report.yml");
    let full = report::assemble("regress", 5_000, vec![sample_profile()], Vec::new());
    let format = ReportOutputFormat::from_path(&path).expect("yml is recognised");
    assert_eq!(format, ReportOutputFormat::Yaml);

    report::save_report(&full, &path, format).expect("report should save");
    let content = fs::read_to_string(&path).expect("report should exist");
    let back: ValidationReport = serde_yaml::from_str(&content).expect("valid yaml report");
    assert_eq!(back.profiles[0].rows.len(), 3);
    assert_eq!(back.profiles[0].rows[1].verdict.label(), "skipped");
}

#[test]
fn unknown_extension_has_no_format() {
    assert!(ReportOutputFormat::from_path(Path::new("report.ncl")).is_none());
    assert_eq!(ReportOutputFormat::Json.extension(), "json");
}

#[test]
fn table_has_one_line_per_row() {
    let profile = sample_profile();
    let table = ReportFormatter::plain().profile_table(&profile);
    // banner, rule, header, rule, rows, rule, summary
    assert_eq!(table.lines().count(), 4 + profile.rows.len() + 2);
    let skip_line = table
        .lines()
        .find(|line| line.trim_start().starts_with("67|"))
        .expect("skip row rendered");
    assert_eq!(skip_line.matches("N/A").count(), 3);
    assert!(table.contains("skipped: 1"));
}
