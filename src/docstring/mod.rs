//! Docstring parsing for return documentation.
//!
//! Three independent conventions are recognized: Sphinx field lists, Google
//! labelled blocks, and Numpy underlined sections. Each parser scans the
//! whole docstring and reports whether its grammar matches at all, plus
//! whatever it documents about the return value. [`detect`] tries them in a
//! fixed priority order and commits to the first match, so behavior is
//! deterministic and no scoring heuristics are involved.

mod google;
mod numpy;
mod sphinx;
pub mod typeexpr;

use std::fmt;

pub use typeexpr::TypeSpec;

/// The documentation convention a docstring was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocStyle {
    Sphinx,
    Google,
    Numpy,
}

impl DocStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStyle::Sphinx => "sphinx",
            DocStyle::Google => "google",
            DocStyle::Numpy => "numpy",
        }
    }
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One documented return case.
#[derive(Debug, Clone, Default)]
pub struct ReturnEntry {
    /// Prose describing the returned value; may be empty.
    pub description: String,
    /// Documented type; empty when only a description was given.
    pub type_spec: TypeSpec,
}

impl ReturnEntry {
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    pub fn has_type(&self) -> bool {
        !self.type_spec.is_empty()
    }
}

/// A docstring successfully matched by one of the conventions.
#[derive(Debug, Clone)]
pub struct Docstring {
    pub style: DocStyle,
    /// Documented return cases, in source order. Empty when the convention
    /// matched other sections but documented nothing about the return.
    pub returns: Vec<ReturnEntry>,
}

impl Docstring {
    /// Any entry carries a non-empty description.
    pub fn has_return_description(&self) -> bool {
        self.returns.iter().any(ReturnEntry::has_description)
    }

    /// Any entry carries a documented type.
    pub fn has_return_type(&self) -> bool {
        self.returns.iter().any(ReturnEntry::has_type)
    }

    /// Any entry's type includes the literal `generator` alternative.
    pub fn declares_generator(&self) -> bool {
        self.returns
            .iter()
            .any(|e| e.type_spec.contains_generator())
    }

    /// The reduced view the reconciler works from.
    pub fn facts(&self) -> DocFacts {
        DocFacts {
            recognized: true,
            has_description: self.has_return_description(),
            has_type: self.has_return_type(),
            declares_generator: self.declares_generator(),
        }
    }
}

/// What the reconciler needs to know about a function's documentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocFacts {
    /// Whether any convention matched the docstring at all.
    pub recognized: bool,
    pub has_description: bool,
    pub has_type: bool,
    pub declares_generator: bool,
}

impl DocFacts {
    /// Facts for a missing or unrecognized docstring.
    pub fn unrecognized() -> Self {
        Self::default()
    }

    pub fn of(doc: Option<&Docstring>) -> Self {
        doc.map(Docstring::facts).unwrap_or_default()
    }
}

/// Detect the docstring's convention and parse its return section.
///
/// Parsers run in fixed priority order (Sphinx, Google, Numpy); the first
/// match wins and the others are never consulted. A missing docstring and
/// text matching no convention both come back as `None`.
pub fn detect(raw: Option<&str>) -> Option<Docstring> {
    let raw = raw?;
    let text = clean(raw);
    sphinx::parse(&text)
        .or_else(|| google::parse(&text))
        .or_else(|| numpy::parse(&text))
}

/// Normalize a raw docstring the way Python tooling does: trim the first
/// line, strip the common indentation of the remaining lines, and drop
/// blank lines at either end. After cleaning, column zero is the
/// documentation's base indentation for every convention parser.
pub fn clean(raw: &str) -> String {
    let mut lines = raw.lines();
    let first = lines.next().unwrap_or("").trim();
    let rest: Vec<&str> = lines.collect();

    let margin = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = Vec::with_capacity(rest.len() + 1);
    out.push(first.to_string());
    for line in rest {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            let stripped: String = line.chars().skip(margin).collect();
            out.push(stripped.trim_end().to_string());
        }
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }

    out.join("\n")
}

/// Leading whitespace width of a line, in characters.
pub(crate) fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
