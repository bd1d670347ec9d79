//! Drives the subcommands end to end from the on-disk fixtures.

use std::{
    fs,
    path::{Path, PathBuf},
};

use pretty_assertions::assert_eq;
use profit_cli::commands::{render_log, run_log, run_session};
use profit_data::{AppConfig, SaleCsvLoader};
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn session_script_logs_two_sales() {
    let script = fs::read_to_string(fixture("session.txt")).expect("fixture script should exist");
    let mut out = Vec::new();

    let summary = run_session(&AppConfig::default(), script.as_bytes(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(summary.items, 2);
    assert_eq!(summary.gross_goal, dec!(500));
    assert_eq!(summary.gross_progress, dec!(150.00));
    assert_eq!(summary.net_total, dec!(93.05));
    assert!(text.contains("Net:     $61.71"), "show output missing:\n{text}");
    assert!(text.contains("Progress: $150.00 / $500.00 (30.0%), 2 items, net $93.05"));
}

#[test]
fn session_script_stops_at_quit() {
    let script = fs::read_to_string(fixture("session.txt")).unwrap();
    let mut out = Vec::new();

    let summary = run_session(&AppConfig::default(), script.as_bytes(), &mut out).unwrap();

    assert!(summary.gross_progress < dec!(999));
}

#[test]
fn csv_sales_log_against_goal() {
    let config = AppConfig::default();
    let inputs = SaleCsvLoader::with_fee_profile(config.fees.clone())
        .load_from_file(&fixture("sales.csv"))
        .expect("fixture sales should load");

    let report = run_log(&config, &inputs, Some(dec!(300))).unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.entries[0].net, dec!(61.71));
    assert_eq!(report.entries[1].net, dec!(31.34));
    assert_eq!(report.summary.progress_pct, dec!(50));

    let text = render_log(&report);
    assert!(text.contains("Skipped 1 sale(s) with no gross"));
    assert!(text.ends_with("Progress: $150.00 / $300.00 (50.0%), 2 items, net $93.05\n"));
}

#[test]
fn log_report_serializes_progress_in_camel_case() {
    let config = AppConfig::default();
    let inputs = SaleCsvLoader::with_fee_profile(config.fees.clone())
        .load_from_file(&fixture("sales.csv"))
        .unwrap();
    let report = run_log(&config, &inputs, None).unwrap();

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["summary"]["items"], 2);
    assert!(json["summary"].get("grossProgress").is_some());
    assert!(json["entries"][0]["inputs"].get("itemPrice").is_some());
}
