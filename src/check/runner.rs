//! Check runner that orchestrates per-file analysis.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::{FunctionFacts, PythonAnalyzer};
use crate::config::Config;
use crate::docstring;

use super::{
    filter_suppressed, parse_suppressions, CheckResult, Rule, Suppression, Violation,
};

/// Executes the return-documentation checks against a set of files.
pub struct Checker {
    base_dir: PathBuf,
}

impl Checker {
    /// Create a new checker rooted at a base directory.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Run the checks over all files.
    ///
    /// Files are processed in parallel; each function is checked against an
    /// independent docstring/control-flow fact pair, so no state is shared
    /// across files or functions. Results are sorted by path and line for
    /// deterministic output.
    pub fn run(&self, files: &[PathBuf], config: &Config) -> anyhow::Result<CheckResult> {
        let accept = config.accept_no_return_doc();

        let per_file: Vec<_> = files
            .par_iter()
            .map(|path| self.check_file(path, accept))
            .collect();

        let mut result = CheckResult::new();
        let mut suppressions: Vec<Suppression> = Vec::new();
        for outcome in per_file {
            match outcome {
                Ok((file_result, file_suppressions)) => {
                    result.merge(file_result);
                    suppressions.extend(file_suppressions);
                }
                Err(e) => {
                    // A file that fails to parse is skipped, not fatal
                    eprintln!("Warning: failed to analyze file: {}", e);
                }
            }
        }

        result.violations.sort_by(|a, b| {
            (&a.file, a.line, a.rule.as_str()).cmp(&(&b.file, b.line, b.rule.as_str()))
        });

        if !suppressions.is_empty() {
            let (active, suppressed) = filter_suppressed(result.violations, &suppressions);
            result.violations = active;
            result.suppressed = suppressed;
        }

        Ok(result)
    }

    /// Check one file: parse, extract function facts, reconcile each
    /// function's docstring against its control flow.
    fn check_file(
        &self,
        path: &Path,
        accept_undocumented: bool,
    ) -> anyhow::Result<(CheckResult, Vec<Suppression>)> {
        let source = std::fs::read(path)?;
        let analyzer = PythonAnalyzer::new();
        let parsed = analyzer.parse(path, &source)?;
        let facts = analyzer.extract_functions(&parsed)?;

        let rel_path = path
            .strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let mut result = CheckResult::new();
        result.scanned = 1;

        for func in &facts.functions {
            result.functions_checked += 1;
            let doc = docstring::detect(func.docstring.as_deref());
            for rule in super::check_function(doc.as_ref(), func, accept_undocumented) {
                result.add_violation(Violation {
                    rule,
                    message: message_for(rule, func),
                    file: rel_path.clone(),
                    line: func.span.start_line,
                    function: func.name.clone(),
                    severity: rule.default_severity(),
                });
            }
        }

        let suppressions = parse_suppressions(&rel_path, &String::from_utf8_lossy(&source));
        Ok((result, suppressions))
    }
}

fn message_for(rule: Rule, func: &FunctionFacts) -> String {
    match rule {
        Rule::MissingReturnDoc => format!(
            "function '{}' returns a value that its docstring does not describe",
            func.name
        ),
        Rule::MissingReturnTypeDoc => format!(
            "return type of function '{}' is documented neither in the docstring nor as an annotation",
            func.name
        ),
        Rule::RedundantReturnsDoc => format!(
            "docstring of function '{}' documents a return value the body never produces",
            func.name
        ),
    }
}
