//! Fact structures extracted from Python source.

use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// One `return` statement in a function's own scope.
#[derive(Debug, Clone)]
pub struct ReturnFact {
    /// Line of the statement (1-indexed).
    pub line: usize,
    /// Whether the statement carries an expression (`return x` vs `return`).
    pub has_value: bool,
    /// Whether that expression is the `None` literal.
    pub is_none_literal: bool,
}

impl ReturnFact {
    /// A return that actually produces a value.
    pub fn is_meaningful(&self) -> bool {
        self.has_value && !self.is_none_literal
    }
}

/// Everything the checker needs to know about one function definition.
///
/// Facts are restricted to the function's own lexical scope: returns and
/// yields inside nested functions or lambdas belong to those functions, not
/// this one. Methods, decorated and nested functions each get their own
/// facts.
#[derive(Debug, Clone)]
pub struct FunctionFacts {
    /// The function name.
    pub name: String,
    /// Span of the whole definition.
    pub span: Span,
    /// Raw docstring text (quote-stripped), if the body starts with one.
    pub docstring: Option<String>,
    /// Direct return statements, in source order.
    pub returns: Vec<ReturnFact>,
    /// Whether the body yields (making the function a generator).
    pub is_generator: bool,
    /// Whether the declaration carries a `-> T` annotation.
    pub has_return_annotation: bool,
}

impl FunctionFacts {
    /// Some return statement carries a real (non-`None`) value.
    pub fn has_meaningful_return(&self) -> bool {
        self.returns.iter().any(ReturnFact::is_meaningful)
    }
}

/// All function facts extracted from a single file.
#[derive(Debug, Clone)]
pub struct FileFunctions {
    /// File path.
    pub path: String,
    /// All function definitions in the file, in source order.
    pub functions: Vec<FunctionFacts>,
    /// Whether the file had parse errors (facts may be partial).
    pub has_parse_errors: bool,
}

impl FileFunctions {
    /// Create empty facts for a file.
    pub fn empty(path: &str) -> Self {
        Self {
            path: path.to_string(),
            functions: Vec::new(),
            has_parse_errors: false,
        }
    }

    /// Find a function by name.
    pub fn find_function(&self, name: &str) -> Option<&FunctionFacts> {
        self.functions.iter().find(|f| f.name == name)
    }
}
