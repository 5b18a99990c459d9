//! Output formatting for retdoc results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::check::{CheckResult, Severity, SuppressedViolation, Violation};
use crate::score::DocCoverage;

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub config: String,
    pub coverage: i32,
    pub grade: String,
    pub threshold: i32,
    pub passed: bool,
    pub files_scanned: usize,
    pub functions_checked: usize,
    pub functions_flagged: usize,
    pub violations: Vec<JsonViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedViolation>,
    pub suppressed_count: usize,
}

/// One violation in JSON output.
#[derive(Serialize, Deserialize)]
pub struct JsonViolation {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub function: String,
    pub message: String,
}

/// Suppressed violation with suppression info.
#[derive(Serialize, Deserialize)]
pub struct JsonSuppressedViolation {
    pub violation: JsonViolation,
    pub suppression: JsonSuppression,
}

/// Suppression directive info.
#[derive(Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rule: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub file: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: String,
}

/// Build the JSON report structure.
pub fn build_json(
    path: &str,
    config_path: &str,
    result: &CheckResult,
    coverage: &DocCoverage,
) -> JsonReport {
    let violations: Vec<JsonViolation> = result.violations.iter().map(violation_to_json).collect();

    let suppressed: Vec<JsonSuppressedViolation> = result
        .suppressed
        .iter()
        .map(|sv| JsonSuppressedViolation {
            violation: violation_to_json(&sv.violation),
            suppression: JsonSuppression {
                rule: sv.suppression.rule.clone(),
                reason: sv.suppression.reason.clone(),
                file: sv.suppression.file.clone(),
                line: sv.suppression.line,
                suppression_type: format!("{:?}", sv.suppression.suppression_type).to_lowercase(),
            },
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.to_string(),
        coverage: coverage.coverage,
        grade: coverage.grade.clone(),
        threshold: coverage.threshold,
        passed: coverage.passed,
        files_scanned: result.scanned,
        functions_checked: result.functions_checked,
        functions_flagged: coverage.functions_flagged,
        violations,
        suppressed,
        suppressed_count: result.suppressed.len(),
    }
}

/// Write results in JSON format.
pub fn write_json(
    path: &str,
    config_path: &str,
    result: &CheckResult,
    coverage: &DocCoverage,
) -> anyhow::Result<()> {
    let report = build_json(path, config_path, result, coverage);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        rule: v.rule.as_str().to_string(),
        severity: v.severity.to_string(),
        file: v.file.clone(),
        line: v.line,
        function: v.function.clone(),
        message: v.message.clone(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "retdoc";
const INFO_URI: &str = "https://github.com/zen-systems/retdoc";

#[derive(Serialize, Deserialize)]
struct SarifReport {
    version: String,
    #[serde(rename = "$schema")]
    schema: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "fullDescription", skip_serializing_if = "Option::is_none")]
    full_description: Option<SarifMessage>,
    #[serde(rename = "helpUri", skip_serializing_if = "Option::is_none")]
    help_uri: Option<String>,
    #[serde(rename = "defaultConfiguration")]
    default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
struct SarifRuleConfig {
    level: String,
}

#[derive(Serialize, Deserialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifact,
    region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
struct SarifArtifact {
    uri: String,
}

#[derive(Serialize, Deserialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
}

/// Rule metadata for SARIF output.
struct RuleInfo {
    name: &'static str,
    short_description: &'static str,
    full_description: &'static str,
    help_uri: &'static str,
    default_level: &'static str,
}

fn get_rule_info(rule_id: &str) -> RuleInfo {
    match rule_id {
        "missing_return_doc" => RuleInfo {
            name: "MissingReturnDoc",
            short_description: "Function returns a value its docstring does not describe",
            full_description: "The function body contains a return statement carrying a real value, but the docstring's return section has no description of it.",
            help_uri: "#missing-return-doc",
            default_level: "warning",
        },
        "missing_return_type_doc" => RuleInfo {
            name: "MissingReturnTypeDoc",
            short_description: "Return type is documented neither in the docstring nor as an annotation",
            full_description: "The function body returns a value, but neither the docstring's return section nor a return-type annotation documents its type.",
            help_uri: "#missing-return-type-doc",
            default_level: "warning",
        },
        "redundant_returns_doc" => RuleInfo {
            name: "RedundantReturnsDoc",
            short_description: "Docstring documents a return value the body never produces",
            full_description: "The docstring describes a return value, but every return statement is bare or returns None, or the function only yields.",
            help_uri: "#redundant-returns-doc",
            default_level: "warning",
        },
        _ => RuleInfo {
            name: "Unknown",
            short_description: "Unknown rule type",
            full_description: "An unknown violation was detected.",
            help_uri: "",
            default_level: "warning",
        },
    }
}

fn map_severity_to_level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.to_string_lossy().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // If they're the same (single file scan), return just the filename
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &CheckResult) -> anyhow::Result<()> {
    // Collect unique rules from violations
    let rule_set: HashSet<String> = result
        .violations
        .iter()
        .map(|v| v.rule.as_str().to_string())
        .collect();

    let rules: Vec<SarifRule> = rule_set
        .iter()
        .map(|rule_id| {
            let info = get_rule_info(rule_id);
            SarifRule {
                id: rule_id.clone(),
                name: info.name.to_string(),
                short_description: SarifMessage {
                    text: info.short_description.to_string(),
                },
                full_description: Some(SarifMessage {
                    text: info.full_description.to_string(),
                }),
                help_uri: if info.help_uri.is_empty() {
                    Some(INFO_URI.to_string())
                } else {
                    Some(format!("{}{}", INFO_URI, info.help_uri))
                },
                default_config: SarifRuleConfig {
                    level: info.default_level.to_string(),
                },
            }
        })
        .collect();

    let results: Vec<SarifResult> = result
        .violations
        .iter()
        .map(|v| SarifResult {
            rule_id: v.rule.as_str().to_string(),
            level: map_severity_to_level(&v.severity).to_string(),
            message: SarifMessage {
                text: v.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(&v.file, base_path),
                    },
                    region: SarifRegion {
                        start_line: if v.line > 0 { v.line } else { 1 },
                    },
                },
            }],
        })
        .collect();

    let report = SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: INFO_URI.to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(
    path: &str,
    config_path: &str,
    result: &CheckResult,
    coverage: &DocCoverage,
    show_suppressed: bool,
) {
    // Header
    println!();
    print!("  ");
    print!("{}", "retdoc".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    // Scan info
    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", config_path);
    println!();

    // Result summary
    write_result_summary(coverage, result.suppressed.len());
    println!();

    // Violations
    if !result.violations.is_empty() {
        write_violations(&result.violations);
        println!();
    }

    // Suppressed violations
    if !result.suppressed.is_empty() {
        write_suppressed_summary(&result.suppressed, show_suppressed);
        println!();
    }

    // Final status line
    write_final_status(result, coverage);
    println!();
}

fn write_result_summary(coverage: &DocCoverage, suppressed_count: usize) {
    if coverage.passed {
        print!("  {}", "✓ PASS".green());
    } else {
        print!("  {}", "✗ FAIL".red());
    }

    print!("  Coverage: ");
    write_colored_coverage(coverage.coverage);
    print!("%  Grade: ");
    write_colored_grade(&coverage.grade);

    if suppressed_count > 0 {
        print!(
            "  {}",
            format!("({} suppressed)", suppressed_count).dimmed()
        );
    }

    println!();
}

fn write_colored_coverage(c: i32) {
    match c {
        c if c >= 95 => print!("{}", c.to_string().green().bold()),
        c if c >= 85 => print!("{}", c.to_string().green()),
        c if c >= 70 => print!("{}", c.to_string().yellow()),
        c if c >= 50 => print!("{}", c.to_string().yellow().bold()),
        _ => print!("{}", c.to_string().red()),
    }
}

fn write_colored_grade(grade: &str) {
    match grade {
        "A" => print!("{}", grade.green().bold()),
        "B" => print!("{}", grade.green()),
        "C" => print!("{}", grade.yellow()),
        "D" => print!("{}", grade.yellow().bold()),
        _ => print!("{}", grade.red()),
    }
}

fn write_violations(violations: &[Violation]) {
    println!("  {} ({}):", "Violations".bold(), violations.len());
    println!();

    for v in violations {
        write_severity_tag(&v.severity);
        print!("   ");
        print!("{:<26}", v.rule.as_str().dimmed());
        print!("{}", v.file.blue());
        if v.line > 0 {
            print!("{}", format!(":{}", v.line).dimmed());
        }
        println!();

        // Message on next line, indented
        println!("            {}", v.message);
        println!();
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_final_status(result: &CheckResult, coverage: &DocCoverage) {
    print!(
        "  {}",
        format!(
            "Checked {} functions in {} files",
            result.functions_checked, result.scanned
        )
        .dimmed()
    );
    print!("  {}", format!("Threshold: {}", coverage.threshold).dimmed());
    print!("  ");

    if coverage.passed {
        print!("{}", "PASSED".green());
    } else {
        print!("{}", "FAILED".red());
    }
    println!();
}

fn write_suppressed_summary(suppressed: &[SuppressedViolation], show_details: bool) {
    println!("  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        println!("    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    println!();
    for sv in suppressed {
        let v = &sv.violation;
        let s = &sv.suppression;

        print!("    {:<26}", v.rule.as_str().dimmed());
        print!("{}", v.file.blue());
        if matches!(s.suppression_type, crate::check::SuppressionType::File) {
            print!("{}", ":* (file)".dimmed());
        } else if v.line > 0 {
            print!("{}", format!(":{}", v.line).dimmed());
        }
        println!();

        if !s.reason.is_empty() {
            println!("            {}", format!("reason: {:?}", s.reason).dimmed());
        }
    }
}
