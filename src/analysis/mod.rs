//! AST-backed Python analysis.
//!
//! Extracts the control-flow facts the checker reconciles against
//! docstrings: per-function return statements, yield presence, and the
//! return-type annotation flag. Built on tree-sitter so facts come from a
//! real parse, not pattern matching over text.

mod facts;
mod python;

pub use facts::{FileFunctions, FunctionFacts, ReturnFact, Span};
pub use python::{ParsedFile, PythonAnalyzer};
