//! Inline suppression of violations via comments.
//!
//! Supports suppression comments like:
//! - `# retdoc:ignore <rule> - <reason>`
//! - `# retdoc:ignore-next-line <rule> - <reason>`
//! - `# retdoc:ignore-file <rule> - <reason>`

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::{Rule, Violation};

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suppression {
    /// Rule to suppress (e.g., "missing_return_doc") or "*" for all
    pub rule: String,
    /// Human-readable reason
    pub reason: String,
    /// File containing the suppression
    pub file: String,
    /// Line number (0 for file-level)
    pub line: usize,
    /// How the suppression applies
    pub suppression_type: SuppressionType,
}

/// A violation that was suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedViolation {
    pub violation: Violation,
    pub suppression: Suppression,
}

lazy_static! {
    /// Python comment style: # retdoc:...
    static ref SUPPRESSION_PATTERN: Regex =
        Regex::new(r"#\s*retdoc:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?").unwrap();
}

/// Parse suppression directives from file content.
pub fn parse_suppressions(file_path: &str, content: &str) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    let mut in_header = true;

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;
        let trimmed = line.trim();

        // Past the leading comment block, file-level directives stop applying
        if in_header && !trimmed.is_empty() && !trimmed.starts_with('#') {
            in_header = false;
        }

        let Some(caps) = SUPPRESSION_PATTERN.captures(line) else {
            continue;
        };
        let directive = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let rule = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let reason = caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let suppression_type = match directive {
            "ignore-file" => {
                // File-level suppressions must be at the top of the file
                if !in_header && line_number > 10 {
                    continue;
                }
                SuppressionType::File
            }
            "ignore-next-line" => SuppressionType::NextLine,
            "ignore" => {
                // Alone on its line the comment shields the next line;
                // trailing a statement it shields that same line
                let before = &line[..caps.get(0).map(|m| m.start()).unwrap_or(0)];
                if before.trim().is_empty() {
                    SuppressionType::NextLine
                } else {
                    SuppressionType::Line
                }
            }
            _ => continue,
        };

        suppressions.push(Suppression {
            rule: rule.to_string(),
            reason,
            file: file_path.to_string(),
            line: if suppression_type == SuppressionType::File {
                0
            } else {
                line_number
            },
            suppression_type,
        });
    }

    suppressions
}

/// Check if a violation matches a suppression.
pub fn matches_suppression(violation: &Violation, suppression: &Suppression) -> bool {
    // Must be same file
    if violation.file != suppression.file {
        return false;
    }

    // Must match rule (or suppression is for all rules with "*")
    if suppression.rule != "*" {
        match Rule::parse(&suppression.rule) {
            Some(rule) if violation.rule == rule => {}
            _ => return false,
        }
    }

    match suppression.suppression_type {
        SuppressionType::File => true,
        SuppressionType::Line => violation.line == suppression.line,
        SuppressionType::NextLine => violation.line == suppression.line + 1,
    }
}

/// Separate violations into active and suppressed based on suppressions.
pub fn filter_suppressed(
    violations: Vec<Violation>,
    suppressions: &[Suppression],
) -> (Vec<Violation>, Vec<SuppressedViolation>) {
    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for violation in violations {
        let matched = suppressions
            .iter()
            .find(|s| matches_suppression(&violation, s));
        match matched {
            Some(suppression) => suppressed.push(SuppressedViolation {
                violation,
                suppression: suppression.clone(),
            }),
            None => active.push(violation),
        }
    }

    (active, suppressed)
}

/// Collect suppressions from all files, keyed by path.
pub fn collect_suppressions<P: AsRef<Path>>(
    files: &[P],
) -> anyhow::Result<HashMap<String, Vec<Suppression>>> {
    let mut result = HashMap::new();

    for file in files {
        let path = file.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => continue, // Skip files we can't read
        };

        let file_str = path.to_string_lossy().to_string();
        let suppressions = parse_suppressions(&file_str, &content);
        if !suppressions.is_empty() {
            result.insert(file_str, suppressions);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Severity;

    fn violation(rule: Rule, file: &str, line: usize) -> Violation {
        Violation {
            rule,
            message: "test".to_string(),
            file: file.to_string(),
            line,
            function: "my_func".to_string(),
            severity: Severity::Warning,
        }
    }

    #[test]
    fn test_parse_file_level_suppression() {
        let content = "# retdoc:ignore-file missing_return_doc - Generated code\n\nimport os\n";
        let suppressions = parse_suppressions("gen.py", content);
        assert_eq!(suppressions.len(), 1);
        assert_eq!(suppressions[0].suppression_type, SuppressionType::File);
        assert_eq!(suppressions[0].rule, "missing_return_doc");
        assert_eq!(suppressions[0].reason, "Generated code");
        assert_eq!(suppressions[0].line, 0);
    }

    #[test]
    fn test_file_level_past_header_is_ignored() {
        let mut content = String::new();
        for i in 0..12 {
            content.push_str(&format!("x{} = {}\n", i, i));
        }
        content.push_str("# retdoc:ignore-file missing_return_doc\n");
        let suppressions = parse_suppressions("late.py", &content);
        assert!(suppressions.is_empty());
    }

    #[test]
    fn test_parse_next_line_suppression() {
        let content = "\n# retdoc:ignore-next-line redundant_returns_doc - intentional\ndef f():\n    pass\n";
        let suppressions = parse_suppressions("test.py", content);
        assert_eq!(suppressions.len(), 1);
        assert_eq!(suppressions[0].suppression_type, SuppressionType::NextLine);
        assert_eq!(suppressions[0].line, 2);
    }

    #[test]
    fn test_trailing_comment_is_line_suppression() {
        let content = "def f():  # retdoc:ignore missing_return_doc - legacy\n    return 1\n";
        let suppressions = parse_suppressions("test.py", content);
        assert_eq!(suppressions.len(), 1);
        assert_eq!(suppressions[0].suppression_type, SuppressionType::Line);
        assert_eq!(suppressions[0].line, 1);
    }

    #[test]
    fn test_matches_suppression() {
        let v = violation(Rule::MissingReturnDoc, "main.py", 5);

        let file_level = Suppression {
            rule: "missing_return_doc".to_string(),
            reason: String::new(),
            file: "main.py".to_string(),
            line: 0,
            suppression_type: SuppressionType::File,
        };
        assert!(matches_suppression(&v, &file_level));

        let next_line = Suppression {
            rule: "missing_return_doc".to_string(),
            reason: String::new(),
            file: "main.py".to_string(),
            line: 4,
            suppression_type: SuppressionType::NextLine,
        };
        assert!(matches_suppression(&v, &next_line));

        let wrong_rule = Suppression {
            rule: "redundant_returns_doc".to_string(),
            reason: String::new(),
            file: "main.py".to_string(),
            line: 0,
            suppression_type: SuppressionType::File,
        };
        assert!(!matches_suppression(&v, &wrong_rule));

        let wrong_file = Suppression {
            rule: "*".to_string(),
            reason: String::new(),
            file: "other.py".to_string(),
            line: 0,
            suppression_type: SuppressionType::File,
        };
        assert!(!matches_suppression(&v, &wrong_file));

        let wildcard = Suppression {
            rule: "*".to_string(),
            reason: String::new(),
            file: "main.py".to_string(),
            line: 0,
            suppression_type: SuppressionType::File,
        };
        assert!(matches_suppression(&v, &wildcard));
    }

    #[test]
    fn test_filter_suppressed() {
        let violations = vec![
            violation(Rule::MissingReturnDoc, "a.py", 3),
            violation(Rule::RedundantReturnsDoc, "a.py", 9),
        ];
        let suppressions = vec![Suppression {
            rule: "missing_return_doc".to_string(),
            reason: "known".to_string(),
            file: "a.py".to_string(),
            line: 2,
            suppression_type: SuppressionType::NextLine,
        }];

        let (active, suppressed) = filter_suppressed(violations, &suppressions);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].rule, Rule::RedundantReturnsDoc);
        assert_eq!(suppressed.len(), 1);
        assert_eq!(suppressed[0].violation.rule, Rule::MissingReturnDoc);
    }
}
