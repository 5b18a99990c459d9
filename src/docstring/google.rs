//! Google (labelled-block) docstring convention.
//!
//! Matches docstrings whose sections are a label line ending in a colon with
//! an indented block beneath it:
//!
//! ```text
//! Args:
//!     doc_type (str): Google
//!
//! Returns:
//!     bool: Always False
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::typeexpr::{is_type_expression, split_type_prefix, TypeSpec};
use super::{indent_width, DocStyle, Docstring, ReturnEntry};

lazy_static! {
    /// A line that is exactly a recognized section label plus a colon.
    static ref SECTION_LABEL: Regex = Regex::new(
        r"^(Args|Arguments|Parameters|Params|Keyword Args|Keyword Arguments|Return|Returns|Yield|Yields|Raise|Raises):\s*$"
    )
    .unwrap();
}

fn is_returns_label(label: &str) -> bool {
    label == "Return" || label == "Returns"
}

/// Parse a cleaned docstring as Google labelled blocks.
///
/// Returns `None` when no recognized section label appears. A match whose
/// sections do not include a returns block is still recognized, with an
/// empty return section.
pub fn parse(text: &str) -> Option<Docstring> {
    let lines: Vec<&str> = text.lines().collect();

    // (line index, label, indent) for every section header
    let headers: Vec<(usize, &str, usize)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let caps = SECTION_LABEL.captures(line.trim_start())?;
            let label = caps.get(1).unwrap().as_str();
            Some((i, label, indent_width(line)))
        })
        .collect();

    if headers.is_empty() {
        return None;
    }

    let returns = headers
        .iter()
        .find(|(_, label, _)| is_returns_label(label))
        .map(|&(idx, _, indent)| parse_returns_block(&lines, idx, indent))
        .unwrap_or_default();

    Some(Docstring {
        style: DocStyle::Google,
        returns,
    })
}

/// Read the indented block under a returns header as a single entry.
fn parse_returns_block(lines: &[&str], header_idx: usize, header_indent: usize) -> Vec<ReturnEntry> {
    let mut block: Vec<&str> = Vec::new();
    for line in &lines[header_idx + 1..] {
        if line.trim().is_empty() {
            if !block.is_empty() {
                block.push("");
            }
            continue;
        }
        if indent_width(line) <= header_indent {
            break;
        }
        block.push(line);
    }
    // Trailing blanks kept nothing worth reading
    while block.last().is_some_and(|l| l.trim().is_empty()) {
        block.pop();
    }

    let Some(first) = block.first().map(|l| l.trim()) else {
        return Vec::new();
    };

    // `<type>:` on the first line makes the rest of it (and the rest of the
    // block) the description; without a valid type prefix the whole block is
    // description only.
    let (type_spec, mut parts) = match split_type_prefix(first) {
        Some((prefix, rest)) if is_type_expression(prefix) => {
            let mut parts = Vec::new();
            if !rest.trim().is_empty() {
                parts.push(rest.trim().to_string());
            }
            (TypeSpec::parse(prefix), parts)
        }
        _ => (TypeSpec::empty(), vec![first.to_string()]),
    };

    for line in block.iter().skip(1) {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    let description = parts.join(" ").trim().to_string();
    vec![ReturnEntry {
        description,
        type_spec,
    }]
}
