//! Sphinx (field-list) docstring convention.
//!
//! Matches docstrings that use reST field tags at the documentation's base
//! indentation:
//!
//! ```text
//! :param doc_type: Sphinx
//! :type doc_type: str
//! :returns: Always False
//! :rtype: bool
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::typeexpr::TypeSpec;
use super::{DocStyle, Docstring, ReturnEntry};

lazy_static! {
    /// `:tag:` or `:tag argument:` at the start of a line, body after.
    static ref FIELD_LINE: Regex =
        Regex::new(r"^:([a-zA-Z]+)(?:\s+([^:\s][^:]*))?:\s*(.*)$").unwrap();
}

/// Field tags that make a docstring count as Sphinx-style.
const KNOWN_TAGS: &[&str] = &[
    "param", "parameter", "arg", "argument", "key", "keyword", "type", "return", "returns",
    "rtype", "raise", "raises", "except", "exception", "var", "ivar", "cvar", "vartype", "yield",
    "yields", "ytype",
];

enum FieldKind {
    ReturnDescription,
    ReturnType,
    Other,
}

fn classify(tag: &str) -> Option<FieldKind> {
    if !KNOWN_TAGS.contains(&tag) {
        return None;
    }
    Some(match tag {
        "return" | "returns" => FieldKind::ReturnDescription,
        "rtype" => FieldKind::ReturnType,
        _ => FieldKind::Other,
    })
}

/// Parse a cleaned docstring as a Sphinx field list.
///
/// Returns `None` when no recognized field tag appears anywhere in the text.
/// A match with zero return fields is still a match; the docstring is then
/// recognized with an empty return section.
pub fn parse(text: &str) -> Option<Docstring> {
    let mut recognized = false;
    let mut descriptions: Vec<String> = Vec::new();
    let mut types: Vec<String> = Vec::new();
    // Open field whose continuation lines are still being collected
    let mut current: Option<(FieldKind, String)> = None;

    let mut flush = |current: &mut Option<(FieldKind, String)>,
                     descriptions: &mut Vec<String>,
                     types: &mut Vec<String>| {
        if let Some((kind, body)) = current.take() {
            match kind {
                FieldKind::ReturnDescription => descriptions.push(body.trim().to_string()),
                FieldKind::ReturnType => types.push(body.trim().to_string()),
                FieldKind::Other => {}
            }
        }
    };

    for line in text.lines() {
        if let Some(caps) = FIELD_LINE.captures(line) {
            let tag = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            if let Some(kind) = classify(tag) {
                flush(&mut current, &mut descriptions, &mut types);
                recognized = true;
                let body = caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string();
                current = Some((kind, body));
                continue;
            }
        }

        if line.trim().is_empty() {
            flush(&mut current, &mut descriptions, &mut types);
        } else if line.starts_with(char::is_whitespace) && current.is_some() {
            // Continuation of the open field's body
            if let Some((_, body)) = current.as_mut() {
                if !body.is_empty() {
                    body.push(' ');
                }
                body.push_str(line.trim());
            }
        } else {
            flush(&mut current, &mut descriptions, &mut types);
        }
    }
    flush(&mut current, &mut descriptions, &mut types);

    if !recognized {
        return None;
    }

    // Description and type fields pair by position; a leftover single on
    // either side still fills its own entry.
    let count = descriptions.len().max(types.len());
    let mut returns = Vec::with_capacity(count);
    for i in 0..count {
        let description = descriptions.get(i).cloned().unwrap_or_default();
        let type_spec = types
            .get(i)
            .filter(|t| !t.is_empty())
            .map(|t| TypeSpec::parse(t))
            .unwrap_or_else(TypeSpec::empty);
        returns.push(ReturnEntry {
            description,
            type_spec,
        });
    }

    Some(Docstring {
        style: DocStyle::Sphinx,
        returns,
    })
}
