//! Python source analysis using tree-sitter.
//!
//! Extracts per-function facts: the docstring literal, direct return
//! statements, yield presence, and the return-type annotation flag. Facts
//! are scoped to each function's own body; nested functions and lambdas are
//! analyzed as functions of their own and never leak returns or yields into
//! their enclosing scope.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::{FileFunctions, FunctionFacts, ReturnFact, Span};

const FUNCTION_QUERY: &str = r#"
(function_definition
  name: (identifier) @func_name
) @function
"#;

/// Holds a parsed tree-sitter tree and associated metadata.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Partial parse errors still yield a valid tree with ERROR nodes; only
    /// a completely failed parse is an error.
    pub fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Python source: {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    /// Extract facts for every function definition in the file.
    ///
    /// Methods, decorated and nested functions are all included, each with
    /// facts restricted to its own scope.
    pub fn extract_functions(&self, parsed: &ParsedFile) -> anyhow::Result<FileFunctions> {
        let query = Query::new(&self.language, FUNCTION_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut functions = Vec::new();

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut func_node = None;

            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                match capture_name {
                    "func_name" => name = parsed.node_text(capture.node).to_string(),
                    "function" => func_node = Some(capture.node),
                    _ => {}
                }
            }

            if let Some(node) = func_node {
                if !name.is_empty() {
                    functions.push(self.function_facts(parsed, node, name));
                }
            }
        }

        functions.sort_by_key(|f| (f.span.start_byte, f.name.clone()));

        Ok(FileFunctions {
            path: parsed.path.clone(),
            functions,
            has_parse_errors: parsed.tree.root_node().has_error(),
        })
    }

    fn function_facts(&self, parsed: &ParsedFile, func_node: Node, name: String) -> FunctionFacts {
        let mut facts = FunctionFacts {
            name,
            span: Span::from_node(func_node),
            docstring: None,
            returns: Vec::new(),
            is_generator: false,
            has_return_annotation: func_node.child_by_field_name("return_type").is_some(),
        };

        let body = func_node.child_by_field_name("body");
        if let Some(body) = body {
            facts.docstring = extract_docstring(parsed, body);
            scan_scope(body, &mut facts);
        }

        facts
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect return statements and yields in the function's own scope.
///
/// Descends into every construct except nested function definitions and
/// lambdas, which open a scope of their own.
fn scan_scope(node: Node, facts: &mut FunctionFacts) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" | "lambda" => {}
            "return_statement" => {
                let exprs: Vec<Node> = {
                    let mut c = child.walk();
                    child
                        .named_children(&mut c)
                        .filter(|n| n.kind() != "comment")
                        .collect()
                };
                facts.returns.push(ReturnFact {
                    line: child.start_position().row + 1,
                    has_value: !exprs.is_empty(),
                    is_none_literal: exprs.len() == 1 && exprs[0].kind() == "none",
                });
                // `return (yield x)` still marks a generator
                scan_scope(child, facts);
            }
            "yield" => {
                facts.is_generator = true;
                scan_scope(child, facts);
            }
            _ => scan_scope(child, facts),
        }
    }
}

/// The docstring literal opening a block, with quotes and prefix stripped.
fn extract_docstring(parsed: &ParsedFile, body: Node) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }

    // Slice between the start and end delimiter tokens; this handles quote
    // styles and prefixes (r, b, u, f) without re-lexing the literal.
    let mut inner_start = None;
    let mut inner_end = None;
    let mut cursor = string.walk();
    for child in string.children(&mut cursor) {
        match child.kind() {
            "string_start" => inner_start = Some(child.end_byte()),
            "string_end" => inner_end = Some(child.start_byte()),
            _ => {}
        }
    }

    match (inner_start, inner_end) {
        (Some(start), Some(end)) if start <= end => {
            Some(String::from_utf8_lossy(&parsed.source[start..end]).to_string())
        }
        _ => Some(parsed.node_text(string).to_string()),
    }
}
