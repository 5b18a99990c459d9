//! Documentation coverage scoring.
//!
//! Coverage is the percentage of checked functions with fully consistent
//! return documentation (0-100, higher is better). A run passes when
//! coverage meets the configured threshold.

use serde::{Deserialize, Serialize};

use crate::check::CheckResult;
use crate::config::Config;

/// Default threshold when the configuration doesn't specify one:
/// any violation fails the run.
pub const DEFAULT_THRESHOLD: i32 = 100;

/// Grade thresholds (minimum coverage for each letter).
pub mod grades {
    pub const A_MIN: i32 = 95;
    pub const B_MIN: i32 = 85;
    pub const C_MIN: i32 = 70;
    pub const D_MIN: i32 = 50;
}

/// The calculated documentation coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocCoverage {
    /// Coverage from 0-100, higher = better documented
    pub coverage: i32,
    /// Letter grade: "A" (95+), "B" (85+), "C" (70+), "D" (50+), "F" below
    pub grade: String,
    /// Number of function definitions checked
    pub functions_checked: usize,
    /// Number of functions with at least one violation
    pub functions_flagged: usize,
    /// Whether the check passed (coverage >= threshold)
    pub passed: bool,
    /// The threshold used
    pub threshold: i32,
}

/// Determine the letter grade from a coverage value.
fn calculate_grade(coverage: i32) -> String {
    match coverage {
        c if c >= grades::A_MIN => "A".to_string(),
        c if c >= grades::B_MIN => "B".to_string(),
        c if c >= grades::C_MIN => "C".to_string(),
        c if c >= grades::D_MIN => "D".to_string(),
        _ => "F".to_string(),
    }
}

/// Calculate documentation coverage from check results.
///
/// Suppressed violations do not count against coverage; an empty scan
/// (zero functions) is full coverage.
pub fn calculate(result: &CheckResult, config: &Config) -> DocCoverage {
    calculate_with_threshold(result, config.coverage_threshold())
}

/// Calculate documentation coverage with a custom threshold.
pub fn calculate_with_threshold(result: &CheckResult, threshold: i32) -> DocCoverage {
    let checked = result.functions_checked;
    let flagged = result.flagged_functions();

    let coverage = if checked == 0 {
        100
    } else {
        let covered = checked.saturating_sub(flagged);
        ((covered * 100) / checked) as i32
    };

    let threshold = threshold.clamp(0, 100);

    DocCoverage {
        coverage,
        grade: calculate_grade(coverage),
        functions_checked: checked,
        functions_flagged: flagged,
        passed: coverage >= threshold,
        threshold,
    }
}
