//! Type-expression parsing for docstring return sections.
//!
//! Docstrings describe return types in free text: `bool`, `int or None`,
//! `list(:class:`mymodule.Class`)`, `:obj:`list` of :obj:`str``. This module
//! normalizes such fragments into a [`TypeSpec`], a set of alternative type
//! names. Parsing never fails: a fragment that fits no recognized shape
//! degrades to a single opaque name equal to the trimmed input.

use std::collections::BTreeSet;
use std::fmt;

/// A normalized set of alternative type names extracted from one fragment.
///
/// Order is irrelevant; downstream checks only care about presence and the
/// two sentinel names (`none` for "no value", `generator` for generator
/// functions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSpec {
    names: BTreeSet<String>,
}

impl TypeSpec {
    /// Parse a raw type-expression fragment.
    pub fn parse(fragment: &str) -> Self {
        let mut names = BTreeSet::new();

        for alt in split_alternatives(fragment) {
            let cleaned = strip_markup(alt);
            let cleaned = cleaned.trim();
            if !cleaned.is_empty() {
                names.insert(cleaned.to_string());
            }
        }

        // Unparsable input still yields one opaque name
        if names.is_empty() && !fragment.trim().is_empty() {
            names.insert(fragment.trim().to_string());
        }

        Self { names }
    }

    /// An empty spec, for entries that document no type.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    /// Whether the "no value" sentinel is among the alternatives.
    /// The comparison is case-insensitive (`None`, `none`, `NONE`).
    pub fn contains_none(&self) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case("none"))
    }

    /// Whether the literal `generator` alternative is present.
    pub fn contains_generator(&self) -> bool {
        self.names.iter().any(|n| n == "generator")
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in &self.names {
            if !first {
                write!(f, " or ")?;
            }
            write!(f, "{}", name)?;
            first = false;
        }
        Ok(())
    }
}

/// Split a fragment on top-level `or` alternatives.
///
/// `or` inside parentheses, brackets, or backticks does not split, and
/// neither does the `of` in wrapper syntax (`list of str` stays whole).
fn split_alternatives(fragment: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_backticks = false;
    let mut start = 0usize;

    let bytes = fragment.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'`' => in_backticks = !in_backticks,
            b'(' | b'[' if !in_backticks => depth += 1,
            b')' | b']' if !in_backticks => depth = depth.saturating_sub(1),
            b'o' if depth == 0 && !in_backticks => {
                // A standalone word "or" separates alternatives
                let is_word_start = i == 0 || bytes[i - 1].is_ascii_whitespace();
                let is_or = fragment[i..].starts_with("or")
                    && matches!(bytes.get(i + 2), Some(c) if c.is_ascii_whitespace());
                if is_word_start && is_or {
                    parts.push(&fragment[start..i]);
                    start = i + 2;
                    i += 2;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&fragment[start..]);
    parts
}

/// Strip reST cross-reference markup down to the bare name it wraps.
///
/// `:class:`mymodule.Class`` becomes `mymodule.Class`; stray backticks are
/// removed as well. Everything else passes through untouched.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(role_len) = role_prefix_len(rest) {
            // Skip ":role:" and copy the backticked content verbatim
            rest = &rest[role_len..];
            continue;
        }
        let mut chars = rest.char_indices();
        let (_, c) = chars.next().unwrap();
        if c != '`' {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Length of a `:role:` prefix at the start of `text`, if one is present
/// and immediately followed by a backtick.
fn role_prefix_len(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(':')?;
    let name_len = rest.find(':')?;
    if name_len == 0 || !rest[..name_len].chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let after = &rest[name_len + 1..];
    if after.starts_with('`') {
        Some(1 + name_len + 1)
    } else {
        None
    }
}

/// Whether a fragment is a plausible type expression.
///
/// Used by the Google parser to decide whether the text before a colon is a
/// documented type or just prose that happens to contain one.
pub fn is_type_expression(fragment: &str) -> bool {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return false;
    }
    split_alternatives(fragment)
        .iter()
        .all(|alt| is_single_type(strip_markup(alt).trim()))
}

fn is_single_type(alt: &str) -> bool {
    if alt.is_empty() {
        return false;
    }
    // container(element)
    if let Some(open) = alt.find('(') {
        return alt.ends_with(')') && is_dotted_name(alt[..open].trim_end());
    }
    // container of element
    if let Some((container, element)) = alt.split_once(" of ") {
        return is_dotted_name(container.trim()) && is_type_expression(element);
    }
    is_dotted_name(alt)
}

fn is_dotted_name(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !part.starts_with(|c: char| c.is_ascii_digit())
        })
}

/// Split a line at the first top-level colon into `(type-candidate, rest)`.
///
/// Colons inside parentheses, backticks, and `:role:` markers do not count,
/// so `list(:class:`X`): desc` splits after the closing parenthesis.
pub fn split_type_prefix(line: &str) -> Option<(&str, &str)> {
    let bytes = line.as_bytes();
    let mut depth = 0usize;
    let mut in_backticks = false;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'`' => in_backticks = !in_backticks,
            b'(' | b'[' if !in_backticks => depth += 1,
            b')' | b']' if !in_backticks => depth = depth.saturating_sub(1),
            b':' if !in_backticks => {
                if let Some(role_len) = role_prefix_len(&line[i..]) {
                    // Skip the role marker and its backticked body
                    i += role_len;
                    let close = line[i + 1..].find('`').map(|p| i + 1 + p);
                    match close {
                        Some(c) => {
                            i = c + 1;
                            continue;
                        }
                        None => return None,
                    }
                }
                if depth == 0 {
                    return Some((&line[..i], &line[i + 1..]));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
