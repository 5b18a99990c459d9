//! Tests for output format stability.
//!
//! The JSON report shape is consumed by CI pipelines; these tests pin the
//! field names and rule identifiers.

use std::path::PathBuf;

use retdoc::check::{CheckResult, Checker, Rule};
use retdoc::config::Config;
use retdoc::report::{build_json, JsonReport};
use retdoc::score;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run_and_build_json() -> JsonReport {
    let testdata = testdata_path();
    let config_path = testdata.join("test-config.yaml");
    let config = Config::parse_file(&config_path).expect("should parse config");

    let mut files: Vec<PathBuf> = std::fs::read_dir(&testdata)
        .expect("should read testdata dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "py").unwrap_or(false))
        .collect();
    files.sort();

    let checker = Checker::new(&testdata);
    let result = checker.run(&files, &config).expect("check should succeed");
    let coverage = score::calculate(&result, &config);

    build_json("testdata", "testdata/test-config.yaml", &result, &coverage)
}

#[test]
fn test_json_report_top_level_fields() {
    let report = run_and_build_json();

    assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(report.path, "testdata");
    assert_eq!(report.config, "testdata/test-config.yaml");
    assert_eq!(report.files_scanned, 4);
    assert_eq!(report.functions_checked, 14);
    assert_eq!(report.threshold, 100);
    assert!(!report.passed);
    assert_eq!(report.suppressed_count, 1);
}

#[test]
fn test_json_violations_use_snake_case_rule_names() {
    let report = run_and_build_json();

    let rules: Vec<&str> = report.violations.iter().map(|v| v.rule.as_str()).collect();
    assert!(rules.contains(&"missing_return_doc"));
    assert!(rules.contains(&"missing_return_type_doc"));
    assert!(rules.contains(&"redundant_returns_doc"));

    for v in &report.violations {
        assert_eq!(v.severity, "warning");
        assert!(!v.function.is_empty());
        assert!(!v.message.is_empty());
    }
}

#[test]
fn test_json_serialization_key_names() {
    let report = run_and_build_json();
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "version",
        "path",
        "config",
        "coverage",
        "grade",
        "threshold",
        "passed",
        "files_scanned",
        "functions_checked",
        "functions_flagged",
        "violations",
        "suppressed",
        "suppressed_count",
    ] {
        assert!(json.get(key).is_some(), "missing key {:?}", key);
    }

    let violation = &json["violations"][0];
    for key in ["rule", "severity", "file", "line", "function", "message"] {
        assert!(violation.get(key).is_some(), "missing violation key {:?}", key);
    }

    let suppression = &json["suppressed"][0]["suppression"];
    assert_eq!(suppression["type"], "nextline");
    assert!(suppression.get("reason").is_some());
}

#[test]
fn test_json_report_round_trips() {
    let report = run_and_build_json();
    let json = serde_json::to_string(&report).unwrap();
    let parsed: JsonReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.coverage, report.coverage);
    assert_eq!(parsed.violations.len(), report.violations.len());
}

#[test]
fn test_empty_result_omits_suppressed_array() {
    let result = CheckResult {
        scanned: 1,
        functions_checked: 2,
        ..Default::default()
    };
    let coverage = score::calculate_with_threshold(&result, 100);
    let report = build_json("src", "(defaults)", &result, &coverage);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("suppressed").is_none());
    assert_eq!(json["coverage"], 100);
    assert_eq!(json["grade"], "A");
}

#[test]
fn test_rule_serde_names_match_as_str() {
    for rule in [
        Rule::MissingReturnDoc,
        Rule::MissingReturnTypeDoc,
        Rule::RedundantReturnsDoc,
    ] {
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, format!("\"{}\"", rule.as_str()));
    }
}
