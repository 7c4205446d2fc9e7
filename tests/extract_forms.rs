//! E2E tests for the extract and schema commands

use std::process::Command;

fn fedtax(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test W-2 extraction into document records
#[test]
fn extract_w2() {
    let output = fedtax(&["extract", "--kind", "w2", "tests/data/w2.md"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("extract output is JSON");
    let record = &json[0];
    assert_eq!(record["source_file"], "w2.md");
    assert_eq!(record["employer_name"], "Acme Widgets");
    assert_eq!(record["wages"], "60000.00");
    assert_eq!(record["federal_tax_withheld"], "5000.00");
    assert!(record.get("error").is_none());
}

/// Test that an empty file becomes a failed record and the batch continues
#[test]
fn extract_batch_with_failure() {
    let output = fedtax(&[
        "extract",
        "--kind",
        "1099-nec",
        "tests/data/empty.md",
        "tests/data/1099_nec.md",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("extract output is JSON");
    assert_eq!(json.as_array().map(Vec::len), Some(2));
    assert!(json[0]["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Failed to extract data")));
    assert_eq!(json[1]["payer_name"], "Brightline Consulting LLC");
    assert_eq!(json[1]["nonemployee_compensation"], "12500.00");
}

/// Test extraction straight into return input
#[test]
fn extract_as_return() {
    let output = fedtax(&[
        "extract",
        "--kind",
        "1099-int",
        "tests/data/1099_int.md",
        "--as-return",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("extract output is JSON");
    assert_eq!(json["1099ints"][0]["payer_name"], "First Community Bank");
    assert_eq!(json["1099ints"][0]["interest_income"], "245.18");
    assert_eq!(json["w2s"].as_array().map(Vec::len), Some(0));
}

/// Test the JSON schema of the return input
#[test]
fn schema_json() {
    let output = fedtax(&["schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"1099ints\""));
    assert!(stdout.contains("\"nonemployee_compensation\""));
}

/// Test the per-document field listing
#[test]
fn schema_fields() {
    let output = fedtax(&["schema", "fields"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("1099-INT (\"1099ints\")"));
    assert!(stdout.contains("interest_income | box1_interest_income"));
}
