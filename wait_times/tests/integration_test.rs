//! End-to-end runs over a price file on disk

use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir, tempdir};
use wait_times::{Config, run_analysis, write_outputs};

fn price_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn config_for(file: &NamedTempFile, out: &TempDir) -> Config {
    let mut config = Config::new(file.path());
    config.deltas = vec![10.0];
    config.output_dir = out.path().join("results");
    config.charts = false;
    config.cross_check = true;
    config
}

#[test]
fn test_gold_series_end_to_end() {
    let file = price_file(&["1800", "1805", "1803", "", "1810", "1795", "1790"]);
    let out = tempdir().unwrap();
    let config = config_for(&file, &out);

    let result = run_analysis(&config).unwrap();
    assert_eq!(result.loaded, 6);

    let outputs = write_outputs(&result, &config).unwrap();
    assert!(outputs.charts.is_empty());

    let csv = fs::read_to_string(&outputs.csv).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(
        rows,
        vec![
            "index,increase_10,decrease_10",
            "0,3,5",
            "1,inf,3",
            "2,inf,3",
            "3,inf,1",
            "4,inf,inf",
            "5,inf,inf",
        ]
    );

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outputs.summary).unwrap()).unwrap();
    assert_eq!(summary["points"], 6);
    let pairs = summary["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0]["direction"], "increase");
    assert_eq!(pairs[0]["reached"], 1);
    assert_eq!(pairs[1]["direction"], "decrease");
    assert_eq!(pairs[1]["reached"], 4);
    assert_eq!(pairs[1]["unreachable"], 2);

    let report = fs::read_to_string(&outputs.report).unwrap();
    assert!(report.contains("Prices analysed: 6"));
}

#[test]
fn test_max_points_truncates_before_analysis() {
    let file = price_file(&["1800", "1805", "1803", "1810", "1795", "1790"]);
    let out = tempdir().unwrap();
    let mut config = config_for(&file, &out);
    config.max_points = Some(3);

    let result = run_analysis(&config).unwrap();
    assert_eq!(result.series.len(), 3);

    let outputs = write_outputs(&result, &config).unwrap();
    let csv = fs::read_to_string(&outputs.csv).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.lines().skip(1).all(|row| row.ends_with(",inf,inf")));
}

#[test]
fn test_malformed_price_file_fails() {
    let file = price_file(&["1800", "abc", "1810"]);
    let out = tempdir().unwrap();
    let config = config_for(&file, &out);

    let err = run_analysis(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

#[test]
fn test_missing_price_file_fails() {
    let out = tempdir().unwrap();
    let mut config = Config::new(out.path().join("missing.txt"));
    config.charts = false;
    assert!(run_analysis(&config).is_err());
}
