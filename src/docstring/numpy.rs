//! Numpy (underlined-section) docstring convention.
//!
//! Matches docstrings whose sections are a label line followed by a dash
//! underline at least as long as the label:
//!
//! ```text
//! Returns
//! -------
//! bool
//!     Always False
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::typeexpr::TypeSpec;
use super::{indent_width, DocStyle, Docstring, ReturnEntry};

lazy_static! {
    static ref SECTION_LABEL: Regex = Regex::new(
        r"^(Args|Arguments|Parameters|Params|Keyword Args|Keyword Arguments|Return|Returns|Yield|Yields|Raise|Raises)\s*$"
    )
    .unwrap();
    static ref UNDERLINE: Regex = Regex::new(r"^-+\s*$").unwrap();
}

fn is_returns_label(label: &str) -> bool {
    label == "Return" || label == "Returns"
}

/// A section header: label line plus its dash underline.
struct Header<'a> {
    line_idx: usize,
    label: &'a str,
}

fn find_headers<'a>(lines: &[&'a str]) -> Vec<Header<'a>> {
    let mut headers = Vec::new();
    for i in 0..lines.len().saturating_sub(1) {
        let Some(caps) = SECTION_LABEL.captures(lines[i].trim_start()) else {
            continue;
        };
        let label = caps.get(1).unwrap().as_str();
        let underline = lines[i + 1];
        if !UNDERLINE.is_match(underline.trim_start()) {
            continue;
        }
        if indent_width(underline) != indent_width(lines[i]) {
            continue;
        }
        if underline.trim().len() < label.len() {
            continue;
        }
        headers.push(Header { line_idx: i, label });
    }
    headers
}

/// Parse a cleaned docstring as Numpy underlined sections.
///
/// Returns `None` when no label-plus-underline pair appears. A match without
/// a returns section is still recognized, with an empty return section.
pub fn parse(text: &str) -> Option<Docstring> {
    let lines: Vec<&str> = text.lines().collect();
    let headers = find_headers(&lines);

    if headers.is_empty() {
        return None;
    }

    let mut returns = Vec::new();
    if let Some(pos) = headers.iter().position(|h| is_returns_label(h.label)) {
        let start = headers[pos].line_idx + 2;
        let end = headers
            .get(pos + 1)
            .map(|h| h.line_idx)
            .unwrap_or(lines.len());
        returns = parse_section(&lines[start..end]);
    }

    Some(Docstring {
        style: DocStyle::Numpy,
        returns,
    })
}

/// Split a section body into entries.
///
/// A line at the section's base indentation starts a new entry and is read
/// as a type expression; deeper-indented lines are that entry's description.
fn parse_section(body: &[&str]) -> Vec<ReturnEntry> {
    let base = match body
        .iter()
        .find(|l| !l.trim().is_empty())
        .map(|l| indent_width(l))
    {
        Some(b) => b,
        None => return Vec::new(),
    };

    let mut entries: Vec<ReturnEntry> = Vec::new();
    let mut description: Vec<String> = Vec::new();
    let mut open_type: Option<TypeSpec> = None;

    let mut flush =
        |open_type: &mut Option<TypeSpec>, description: &mut Vec<String>, entries: &mut Vec<ReturnEntry>| {
            if let Some(type_spec) = open_type.take() {
                entries.push(ReturnEntry {
                    description: description.join(" ").trim().to_string(),
                    type_spec,
                });
            }
            description.clear();
        };

    for line in body {
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_width(line);
        if indent < base {
            break;
        }
        if indent == base {
            flush(&mut open_type, &mut description, &mut entries);
            open_type = Some(TypeSpec::parse(line.trim()));
        } else {
            description.push(line.trim().to_string());
        }
    }
    flush(&mut open_type, &mut description, &mut entries);

    entries
}
