//! E2E tests for the command line interface

use std::process::{Command, Output};

fn itax(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Old regime, 6 lakh, no deductions
#[test]
fn compute_from_flags() {
    let output = itax(&[
        "compute", "--income", "600000", "--regime", "old", "--age", "below60", "--year", "2027",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("OLD REGIME"));
    assert!(stdout.contains("₹32,500.00"));
    assert!(stdout.contains("TOTAL TAX: ₹33,800.00"));
    assert!(stdout.contains("5.63%"));
}

#[test]
fn compute_from_input_file() {
    let output = itax(&["compute", "--input", "tests/data/input.json", "--year", "2026-27"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("TOTAL TAX: ₹33,800.00"));
}

#[test]
fn compute_explain_shows_slabs() {
    let output = itax(&[
        "compute", "--income", "1000000", "--standard-deduction", "--year", "2027", "--explain",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("SLAB BREAKDOWN"));
    assert!(stdout.contains("₹4,00,000.00 - ₹8,00,000.00"));
    assert!(stdout.contains("Rebate u/s 87A"));
    assert!(stdout.contains("TOTAL TAX: ₹0.00"));
}

#[test]
fn compute_json_output() {
    let output = itax(&[
        "compute", "--income", "1200100", "--year", "2027", "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["regime"], "new");
    assert!(json["total_tax"].as_str().unwrap().starts_with("104"));
}

#[test]
fn compute_old_regime_requires_age() {
    let output = itax(&["compute", "--income", "600000", "--regime", "old", "--year", "2027"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("age bracket is required"));
}

#[test]
fn compute_rejects_unknown_year() {
    let output = itax(&["compute", "--income", "600000", "--year", "1999"]);
    assert!(!output.status.success());
}

#[test]
fn compare_recommends_new_regime() {
    let output = itax(&[
        "compare",
        "--income",
        "1000000",
        "--age",
        "below60",
        "--standard-deduction",
        "-d",
        "80C=150000",
        "--year",
        "2027",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Old regime"));
    assert!(stdout.contains("New regime"));
    assert!(stdout.contains("NEW regime recommended, saving ₹75,400.00"));
}

#[test]
fn batch_csv() {
    let output = itax(&["batch", "tests/data/cases.csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    // Header plus one row per case
    assert_eq!(stdout.lines().count(), 5);
    assert!(stdout.starts_with("id,assessment_year,"));
    assert!(stdout.contains("salaried,2026-27,800000,925000,"));
    assert!(stdout.contains("retired,2026-27,550000,600000,"));
    assert!(stdout.contains("home_loan,2025-26,1340000,1725000,"));
    assert!(stdout.contains("gross income must not be negative"));
}

#[test]
fn custom_config_changes_rates() {
    let output = itax(&[
        "--config",
        "tests/data/config.json",
        "compute",
        "--income",
        "1500000",
        "--year",
        "2027",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    // 5% cess instead of the built-in 4%
    assert!(stdout.contains("TOTAL TAX: ₹1,10,250.00"));
}

#[test]
fn invalid_config_is_rejected() {
    let output = itax(&["--config", "tests/data/bad_config.json", "slabs"]);
    assert!(!output.status.success());
}

#[test]
fn slabs_lists_both_regimes() {
    let output = itax(&["slabs", "--year", "2026-27"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("OLD REGIME"));
    assert!(stdout.contains("NEW REGIME"));
    assert!(stdout.contains("above ₹24,00,000.00"));
    assert!(stdout.contains("Table fingerprint:"));
}

#[test]
fn schema_formats() {
    let output = itax(&["schema", "config"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("assessment_year"));

    let output = itax(&["schema", "csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("id,year,gross_income,age_bracket"));
}
