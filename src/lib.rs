//! Retdoc - docstring return-documentation checker for Python.
//!
//! Retdoc verifies that a function's docstring accurately describes whether
//! the function returns a value and what that value's type is, and flags
//! docstrings that describe a return the body never performs.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for AST-based analysis:
//!
//! - `docstring`: Convention parsers (Sphinx, Google, Numpy) and type
//!   expression normalization
//! - `analysis`: Per-function control-flow facts extracted from Python
//!   source (returns, yields, annotations)
//! - `check`: Reconciliation of documented vs. actual returns, plus the
//!   per-file runner and inline suppressions
//! - `config`: YAML configuration schema
//! - `report`: Output formatting (pretty, JSON, SARIF)
//! - `score`: Documentation coverage calculation

pub mod analysis;
pub mod check;
pub mod cli;
pub mod config;
pub mod docstring;
pub mod report;
pub mod score;

pub use analysis::{FileFunctions, FunctionFacts, PythonAnalyzer, ReturnFact, Span};
pub use check::{check_function, CheckResult, Checker, Rule, Severity, Violation};
pub use config::Config;
pub use docstring::{detect, DocFacts, DocStyle, Docstring, ReturnEntry, TypeSpec};
pub use score::DocCoverage;
