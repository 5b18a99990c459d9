//! Core types for check results.

use serde::{Deserialize, Serialize};

/// Severity levels for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// The checks a function's return documentation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// The body returns a value the docstring does not describe.
    #[serde(rename = "missing_return_doc")]
    MissingReturnDoc,
    /// The body returns a value whose type is documented nowhere (neither
    /// docstring nor annotation).
    #[serde(rename = "missing_return_type_doc")]
    MissingReturnTypeDoc,
    /// The docstring documents a return value the body never produces.
    #[serde(rename = "redundant_returns_doc")]
    RedundantReturnsDoc,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::MissingReturnDoc => "missing_return_doc",
            Rule::MissingReturnTypeDoc => "missing_return_type_doc",
            Rule::RedundantReturnsDoc => "redundant_returns_doc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "missing_return_doc" => Some(Rule::MissingReturnDoc),
            "missing_return_type_doc" => Some(Rule::MissingReturnTypeDoc),
            "redundant_returns_doc" => Some(Rule::RedundantReturnsDoc),
            _ => None,
        }
    }

    /// Findings are warnings by default; the host decides what fails a run.
    pub fn default_severity(&self) -> Severity {
        Severity::Warning
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub rule: Rule,
    pub message: String,
    pub file: String,
    pub line: usize,
    /// The function whose documentation was checked.
    pub function: String,
    pub severity: Severity,
}

impl Violation {
    /// Create a unique key for this violation (for deduplication/comparison).
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.rule, self.file, self.function)
    }
}

/// Results of running the checker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResult {
    pub violations: Vec<Violation>,
    /// Violations that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<super::SuppressedViolation>,
    /// Number of files scanned
    pub scanned: usize,
    /// Number of function definitions checked
    pub functions_checked: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: CheckResult) {
        self.violations.extend(other.violations);
        self.suppressed.extend(other.suppressed);
        self.scanned += other.scanned;
        self.functions_checked += other.functions_checked;
    }

    /// Add a violation to the result.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Number of suppressed violations.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    /// Check if there are any error-severity violations.
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Number of distinct functions with at least one violation.
    pub fn flagged_functions(&self) -> usize {
        let mut keys: Vec<(&str, &str)> = self
            .violations
            .iter()
            .map(|v| (v.file.as_str(), v.function.as_str()))
            .collect();
        keys.sort();
        keys.dedup();
        keys.len()
    }
}
